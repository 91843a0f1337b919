use std::collections::{BTreeMap, HashSet};

use crate::analyzers::types::TrendPoint;
use crate::analyzers::utility::distinct_in_order;
use crate::table::CanonicalTable;

/// Every school name in the table, in first-seen order. These are the options
/// of the trend comparison multi-select.
pub fn school_names(table: &CanonicalTable) -> Vec<String> {
    distinct_in_order(table.iter().map(|r| r.name.clone()))
}

/// Total enrollment per `(school, year)` for the selected schools, ordered by
/// school year and then school name.
///
/// An empty selection yields an empty result. Names not present in the table
/// are ignored.
pub fn enrollment_trend<S: AsRef<str>>(table: &CanonicalTable, selected: &[S]) -> Vec<TrendPoint> {
    if selected.is_empty() {
        return Vec::new();
    }

    let wanted: HashSet<&str> = selected.iter().map(AsRef::as_ref).collect();
    let mut grouped: BTreeMap<(&str, &str), u64> = BTreeMap::new();

    for record in table.iter().filter(|r| wanted.contains(r.name.as_str())) {
        let total = grouped
            .entry((record.school_year.as_str(), record.name.as_str()))
            .or_default();
        *total = total.saturating_add(record.total_enrollment.unwrap_or(0));
    }

    grouped
        .into_iter()
        .map(|((school_year, name), total_enrollment)| TrendPoint {
            name: name.to_string(),
            school_year: school_year.to_string(),
            total_enrollment,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SchoolRecord;

    fn record(name: &str, year: &str, total: Option<u64>) -> SchoolRecord {
        SchoolRecord {
            name: name.to_string(),
            school_year: year.to_string(),
            total_enrollment: total,
            ..Default::default()
        }
    }

    fn sample_table() -> CanonicalTable {
        CanonicalTable::from_records(vec![
            record("PS 2", "2007-2008", Some(210)),
            record("PS 1", "2006-2007", Some(110)),
            record("PS 1", "2005-2006", Some(100)),
            record("PS 2", "2005-2006", Some(200)),
            record("PS 1", "2005-2006", Some(5)),
            record("PS 3", "2005-2006", Some(999)),
            record("PS 1", "2007-2008", None),
        ])
    }

    #[test]
    fn test_school_names_first_seen() {
        assert_eq!(school_names(&sample_table()), vec!["PS 2", "PS 1", "PS 3"]);
    }

    #[test]
    fn test_empty_selection_is_empty() {
        let selected: [&str; 0] = [];
        assert!(enrollment_trend(&sample_table(), &selected).is_empty());
    }

    #[test]
    fn test_trend_groups_and_orders_by_year() {
        let points = enrollment_trend(&sample_table(), &["PS 1", "PS 2"]);

        let years: Vec<(&str, &str, u64)> = points
            .iter()
            .map(|p| (p.school_year.as_str(), p.name.as_str(), p.total_enrollment))
            .collect();

        assert_eq!(
            years,
            vec![
                ("2005-2006", "PS 1", 105),
                ("2005-2006", "PS 2", 200),
                ("2006-2007", "PS 1", 110),
                ("2007-2008", "PS 1", 0),
                ("2007-2008", "PS 2", 210),
            ]
        );
    }

    #[test]
    fn test_unknown_names_are_ignored() {
        let points = enrollment_trend(&sample_table(), &["PS 3".to_string(), "Nope".to_string()]);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].total_enrollment, 999);
    }
}
