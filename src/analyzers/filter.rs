//! Borough → district → school cascading filter.
//!
//! Each level offers only the values observed among the rows that match the
//! levels above it, in the order they first appear in the table.

use crate::analyzers::types::FilterState;
use crate::analyzers::utility::distinct_in_order;
use crate::model::Borough;
use crate::table::CanonicalTable;

pub fn borough_options(table: &CanonicalTable) -> Vec<Borough> {
    distinct_in_order(table.iter().map(|r| r.borough))
}

pub fn district_options(table: &CanonicalTable, borough: Borough) -> Vec<u32> {
    distinct_in_order(table.in_borough(borough).map(|r| r.school_district))
}

pub fn school_options(table: &CanonicalTable, borough: Borough, district: u32) -> Vec<String> {
    distinct_in_order(
        table
            .in_borough(borough)
            .filter(|r| r.school_district == district)
            .map(|r| r.name.clone()),
    )
}

/// Resolves a possibly partial selection against the table.
///
/// A level whose requested value is missing or not among its options falls
/// back to the first option, the way a select box preselects its first entry.
/// Levels below an empty level stay empty.
pub fn resolve(
    table: &CanonicalTable,
    borough: Option<Borough>,
    district: Option<u32>,
    school: Option<&str>,
) -> FilterState {
    let boroughs = borough_options(table);
    let borough = pick(&boroughs, borough);

    let districts = borough
        .map(|b| district_options(table, b))
        .unwrap_or_default();
    let district = pick(&districts, district);

    let schools = match (borough, district) {
        (Some(b), Some(d)) => school_options(table, b, d),
        _ => Vec::new(),
    };
    let school = match school {
        Some(name) if schools.iter().any(|s| s == name) => Some(name.to_string()),
        _ => schools.first().cloned(),
    };

    FilterState {
        boroughs,
        districts,
        schools,
        borough,
        district,
        school,
    }
}

fn pick<T: Copy + PartialEq>(options: &[T], requested: Option<T>) -> Option<T> {
    match requested {
        Some(value) if options.contains(&value) => Some(value),
        _ => options.first().copied(),
    }
}
