use std::collections::BTreeMap;

use crate::analyzers::borough::race_counts;
use crate::analyzers::types::{
    DemographicBreakdown, DemographicMode, SchoolSummary, YearEnrollment, YearGender, YearRace,
};
use crate::analyzers::utility::sum_present;
use crate::model::{Grade, SchoolRecord};
use crate::table::CanonicalTable;

/// First school year of the dataset, the baseline of the enrollment delta.
pub const FIRST_SCHOOL_YEAR: &str = "2005-2006";
/// Last school year of the dataset.
pub const LAST_SCHOOL_YEAR: &str = "2011-2012";

/// Builds the school details page for `name`.
///
/// Returns `None` when the table holds no rows for that school.
#[tracing::instrument(skip(table))]
pub fn school_summary(
    table: &CanonicalTable,
    name: &str,
    mode: DemographicMode,
) -> Option<SchoolSummary> {
    let rows: Vec<&SchoolRecord> = table.for_school(name).collect();
    if rows.is_empty() {
        return None;
    }

    let by_year = group_by_year(&rows);

    let enrollment_by_year = by_year
        .iter()
        .map(|(year, records)| YearEnrollment {
            school_year: year.to_string(),
            total_enrollment: sum_present(records.iter().map(|r| r.total_enrollment)),
        })
        .collect();

    let demographics = match mode {
        DemographicMode::Race => DemographicBreakdown::Race {
            by_year: by_year
                .iter()
                .map(|(year, records)| YearRace {
                    school_year: year.to_string(),
                    counts: race_counts(records.iter().copied()),
                })
                .collect(),
        },
        DemographicMode::Gender => DemographicBreakdown::Gender {
            by_year: by_year
                .iter()
                .map(|(year, records)| YearGender {
                    school_year: year.to_string(),
                    female: sum_present(records.iter().map(|r| r.female_count)),
                    male: sum_present(records.iter().map(|r| r.male_count)),
                })
                .collect(),
            total_female: sum_present(rows.iter().map(|r| r.female_count)),
            total_male: sum_present(rows.iter().map(|r| r.male_count)),
        },
    };

    Some(SchoolSummary {
        name: name.to_string(),
        total_enrollment: sum_present(rows.iter().map(|r| r.total_enrollment)),
        enrollment_difference: enrollment_difference(&rows),
        grades_offered: grades_offered(&rows),
        enrollment_by_year,
        demographics,
    })
}

/// Enrollment in the last school year minus the first. Zero when the school
/// has no enrollment figure for either year.
pub fn enrollment_difference(rows: &[&SchoolRecord]) -> i64 {
    let enrollment_in = |year: &str| -> Option<u64> {
        rows.iter()
            .filter(|r| r.school_year == year)
            .filter_map(|r| r.total_enrollment)
            .reduce(u64::saturating_add)
    };

    match (
        enrollment_in(FIRST_SCHOOL_YEAR),
        enrollment_in(LAST_SCHOOL_YEAR),
    ) {
        (Some(first), Some(last)) => last as i64 - first as i64,
        _ => 0,
    }
}

/// Grades with a positive enrollment summed over all of the school's rows.
/// Missing counts contribute zero.
pub fn grades_offered(rows: &[&SchoolRecord]) -> Vec<Grade> {
    Grade::ALL
        .into_iter()
        .filter(|grade| sum_present(rows.iter().map(|r| r.grades.get(*grade))) > 0)
        .collect()
}

fn group_by_year<'a>(rows: &[&'a SchoolRecord]) -> BTreeMap<&'a str, Vec<&'a SchoolRecord>> {
    let mut grouped: BTreeMap<&str, Vec<&SchoolRecord>> = BTreeMap::new();
    for record in rows.iter().copied() {
        grouped
            .entry(record.school_year.as_str())
            .or_default()
            .push(record);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GradeCounts;

    fn record(year: &str, total: Option<u64>) -> SchoolRecord {
        SchoolRecord {
            dbn: "07X123".to_string(),
            name: "PS 1".to_string(),
            school_year: year.to_string(),
            total_enrollment: total,
            ..Default::default()
        }
    }

    fn grades(pairs: &[(Grade, Option<u64>)]) -> GradeCounts {
        let mut counts = [None; 14];
        for (grade, count) in pairs {
            counts[*grade as usize] = *count;
        }
        GradeCounts::new(counts)
    }

    #[test]
    fn test_enrollment_difference() {
        let a = record("2005-2006", Some(500));
        let b = record("2011-2012", Some(700));
        assert_eq!(enrollment_difference(&[&a, &b]), 200);
        assert_eq!(enrollment_difference(&[&b, &a]), 200);
    }

    #[test]
    fn test_enrollment_difference_can_be_negative() {
        let a = record("2005-2006", Some(700));
        let b = record("2011-2012", Some(450));
        assert_eq!(enrollment_difference(&[&a, &b]), -250);
    }

    #[test]
    fn test_enrollment_difference_missing_endpoint() {
        let a = record("2006-2007", Some(500));
        let b = record("2011-2012", Some(700));
        assert_eq!(enrollment_difference(&[&a, &b]), 0);

        let c = record("2005-2006", None);
        assert_eq!(enrollment_difference(&[&c, &b]), 0);
    }

    #[test]
    fn test_grades_offered_across_years() {
        let a = SchoolRecord {
            grades: grades(&[
                (Grade::PreK, Some(0)),
                (Grade::K, Some(5)),
                (Grade::Grade1, None),
                (Grade::Grade2, Some(3)),
            ]),
            ..record("2005-2006", Some(8))
        };
        let b = SchoolRecord {
            grades: grades(&[(Grade::Grade12, Some(1))]),
            ..record("2006-2007", Some(1))
        };

        assert_eq!(grades_offered(&[&a]), vec![Grade::K, Grade::Grade2]);
        assert_eq!(
            grades_offered(&[&a, &b]),
            vec![Grade::K, Grade::Grade2, Grade::Grade12]
        );
    }

    #[test]
    fn test_unknown_school_has_no_summary() {
        let table = CanonicalTable::from_records(vec![record("2005-2006", Some(1))]);
        assert!(school_summary(&table, "PS 999", DemographicMode::Race).is_none());
    }

    #[test]
    fn test_summary_race_mode() {
        let table = CanonicalTable::from_records(vec![
            SchoolRecord {
                asian_count: Some(10),
                hispanic_count: Some(20),
                grades: grades(&[(Grade::K, Some(5))]),
                ..record("2011-2012", Some(700))
            },
            SchoolRecord {
                asian_count: Some(4),
                black_count: Some(6),
                ..record("2005-2006", Some(500))
            },
        ]);

        let summary = school_summary(&table, "PS 1", DemographicMode::Race).unwrap();

        assert_eq!(summary.total_enrollment, 1200);
        assert_eq!(summary.enrollment_difference, 200);
        assert_eq!(summary.offering(), "K");
        assert_eq!(summary.enrollment_by_year[0].school_year, "2005-2006");
        assert_eq!(summary.enrollment_by_year[1].total_enrollment, 700);

        match summary.demographics {
            DemographicBreakdown::Race { by_year } => {
                assert_eq!(by_year.len(), 2);
                assert_eq!(by_year[0].counts.asian, 4);
                assert_eq!(by_year[0].counts.black, 6);
                assert_eq!(by_year[1].counts.hispanic, 20);
            }
            other => panic!("expected race breakdown, got {other:?}"),
        }
    }

    #[test]
    fn test_summary_gender_mode() {
        let table = CanonicalTable::from_records(vec![
            SchoolRecord {
                female_count: Some(30),
                male_count: Some(20),
                ..record("2005-2006", Some(50))
            },
            SchoolRecord {
                female_count: Some(35),
                male_count: None,
                ..record("2006-2007", Some(60))
            },
        ]);

        let summary = school_summary(&table, "PS 1", DemographicMode::Gender).unwrap();

        match summary.demographics {
            DemographicBreakdown::Gender {
                by_year,
                total_female,
                total_male,
            } => {
                assert_eq!(by_year.len(), 2);
                assert_eq!(by_year[1].female, 35);
                assert_eq!(by_year[1].male, 0);
                assert_eq!(total_female, 65);
                assert_eq!(total_male, 20);
            }
            other => panic!("expected gender breakdown, got {other:?}"),
        }
    }
}
