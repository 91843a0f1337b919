//! Result types handed to the presentation layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Borough, Grade};

/// Headline enrollment card for one borough.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoroughTotal {
    pub borough: Borough,
    pub total_enrollment: u64,
}

/// Unsigned female/male enrollment for one borough.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderSplit {
    pub borough: Borough,
    pub female: u64,
    pub male: u64,
}

/// Mean free-or-reduced-lunch percentage for one borough.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LunchAverage {
    pub borough: Borough,
    /// `None` when no school in the borough reported a usable value.
    pub average_percent: Option<f64>,
    pub reporting_rows: usize,
}

/// Racial composition of one borough, or of one school in one year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RaceCounts {
    pub asian: u64,
    pub black: u64,
    pub hispanic: u64,
    pub white: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoroughRace {
    pub borough: Borough,
    #[serde(flatten)]
    pub counts: RaceCounts,
}

/// Enrollment summed per district, joined to the boundary file on `schoolDistrict`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictTotal {
    #[serde(rename = "schoolDistrict")]
    pub school_district: u32,
    pub total_enrollment: u64,
}

/// One point of a school's enrollment line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub name: String,
    pub school_year: String,
    pub total_enrollment: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearEnrollment {
    pub school_year: String,
    pub total_enrollment: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearRace {
    pub school_year: String,
    #[serde(flatten)]
    pub counts: RaceCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearGender {
    pub school_year: String,
    pub female: u64,
    pub male: u64,
}

/// Which demographic view the school details page shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum DemographicMode {
    #[default]
    Race,
    Gender,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DemographicBreakdown {
    Race {
        by_year: Vec<YearRace>,
    },
    Gender {
        by_year: Vec<YearGender>,
        total_female: u64,
        total_male: u64,
    },
}

/// Everything the school details page needs for one school.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolSummary {
    pub name: String,
    pub total_enrollment: u64,
    /// Latest minus earliest year, 0 when either year is missing.
    pub enrollment_difference: i64,
    pub grades_offered: Vec<Grade>,
    pub enrollment_by_year: Vec<YearEnrollment>,
    pub demographics: DemographicBreakdown,
}

impl SchoolSummary {
    /// Grades joined for display, e.g. `"K, Grade1, Grade2"`.
    pub fn offering(&self) -> String {
        self.grades_offered
            .iter()
            .map(Grade::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Choices available at each level of the borough → district → school filter,
/// plus the selection actually in effect.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterState {
    pub boroughs: Vec<Borough>,
    pub districts: Vec<u32>,
    pub schools: Vec<String>,
    pub borough: Option<Borough>,
    pub district: Option<u32>,
    pub school: Option<String>,
}

/// Intro page of the dashboard: every borough-level result in one document.
#[derive(Debug, Serialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub source: Option<String>,
    pub record_count: usize,
    pub skipped_rows: usize,
    pub enrollment: Vec<BoroughTotal>,
    pub gender: Vec<GenderSplit>,
    pub lunch: Vec<LunchAverage>,
    pub race: Vec<BoroughRace>,
    pub districts: Vec<DistrictTotal>,
}
