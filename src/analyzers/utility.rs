use std::collections::HashSet;
use std::hash::Hash;

/// Arithmetic mean of the present values. Returns `None` when nothing is present,
/// so missing values never count as zero.
pub fn mean_present<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Sum of counts with missing values treated as zero. Saturates at `u64::MAX`.
pub fn sum_present<I>(values: I) -> u64
where
    I: IntoIterator<Item = Option<u64>>,
{
    values.into_iter().flatten().fold(0, u64::saturating_add)
}

/// Distinct values in first-seen order.
pub fn distinct_in_order<T, I>(values: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}
