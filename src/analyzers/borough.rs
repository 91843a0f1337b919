use chrono::Utc;
use std::collections::BTreeMap;

use crate::analyzers::types::{
    BoroughRace, BoroughTotal, DashboardReport, DistrictTotal, GenderSplit, LunchAverage,
    RaceCounts,
};
use crate::analyzers::utility::{mean_present, sum_present};
use crate::model::{Borough, Race, SchoolRecord};
use crate::table::CanonicalTable;

/// Total enrollment for each named borough. Unknown-borough rows are left out
/// of these cards but still count toward [`district_totals`].
pub fn total_enrollment_by_borough(table: &CanonicalTable) -> Vec<BoroughTotal> {
    Borough::NAMED
        .into_iter()
        .map(|borough| BoroughTotal {
            borough,
            total_enrollment: sum_present(table.in_borough(borough).map(|r| r.total_enrollment)),
        })
        .collect()
}

/// Female and male enrollment per named borough, both unsigned.
pub fn gender_split_by_borough(table: &CanonicalTable) -> Vec<GenderSplit> {
    Borough::NAMED
        .into_iter()
        .map(|borough| GenderSplit {
            borough,
            female: sum_present(table.in_borough(borough).map(|r| r.female_count)),
            male: sum_present(table.in_borough(borough).map(|r| r.male_count)),
        })
        .collect()
}

/// Mean lunch percentage per named borough, skipping rows without a value.
pub fn average_lunch_by_borough(table: &CanonicalTable) -> Vec<LunchAverage> {
    Borough::NAMED
        .into_iter()
        .map(|borough| {
            let values: Vec<Option<f64>> = table
                .in_borough(borough)
                .map(|r| r.free_or_reduced_lunch_percent)
                .collect();

            LunchAverage {
                borough,
                reporting_rows: values.iter().flatten().count(),
                average_percent: mean_present(values),
            }
        })
        .collect()
}

/// Asian, Black, Hispanic and White enrollment per named borough.
pub fn racial_composition_by_borough(table: &CanonicalTable) -> Vec<BoroughRace> {
    Borough::NAMED
        .into_iter()
        .map(|borough| BoroughRace {
            borough,
            counts: race_counts(table.in_borough(borough)),
        })
        .collect()
}

/// Enrollment summed per school district across every row, Unknown boroughs
/// included, ordered by district number.
pub fn district_totals(table: &CanonicalTable) -> Vec<DistrictTotal> {
    let mut totals: BTreeMap<u32, u64> = BTreeMap::new();
    for record in table.iter() {
        let total = totals.entry(record.school_district).or_default();
        *total = total.saturating_add(record.total_enrollment.unwrap_or(0));
    }

    totals
        .into_iter()
        .map(|(school_district, total_enrollment)| DistrictTotal {
            school_district,
            total_enrollment,
        })
        .collect()
}

/// Builds the intro-page report from every borough-level query.
#[tracing::instrument(skip(table), fields(records = table.len()))]
pub fn dashboard_report(table: &CanonicalTable) -> DashboardReport {
    DashboardReport {
        generated_at: Utc::now(),
        source: table.source().map(|p| p.display().to_string()),
        record_count: table.len(),
        skipped_rows: table.skipped().len(),
        enrollment: total_enrollment_by_borough(table),
        gender: gender_split_by_borough(table),
        lunch: average_lunch_by_borough(table),
        race: racial_composition_by_borough(table),
        districts: district_totals(table),
    }
}

pub(crate) fn race_counts<'a, I>(records: I) -> RaceCounts
where
    I: IntoIterator<Item = &'a SchoolRecord>,
{
    records
        .into_iter()
        .fold(RaceCounts::default(), |mut acc, r| {
            acc.asian = acc.asian.saturating_add(r.race_count(Race::Asian).unwrap_or(0));
            acc.black = acc.black.saturating_add(r.race_count(Race::Black).unwrap_or(0));
            acc.hispanic = acc.hispanic.saturating_add(r.race_count(Race::Hispanic).unwrap_or(0));
            acc.white = acc.white.saturating_add(r.race_count(Race::White).unwrap_or(0));
            acc
        })
}
