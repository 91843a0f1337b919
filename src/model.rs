//! Canonical record types for the school demographics dataset.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseBoroughError;

/// NYC borough encoded by the third character of a DBN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Borough {
    Manhattan,
    Bronx,
    Brooklyn,
    Queens,
    #[serde(rename = "Staten Island")]
    StatenIsland,
    #[default]
    Unknown,
}

impl Borough {
    /// The five named boroughs, in dashboard card order.
    pub const NAMED: [Borough; 5] = [
        Borough::Manhattan,
        Borough::Bronx,
        Borough::Brooklyn,
        Borough::Queens,
        Borough::StatenIsland,
    ];

    /// Looks up a DBN borough code. Unrecognised codes resolve to [`Borough::Unknown`].
    pub fn from_code(code: char) -> Self {
        match code {
            'M' => Borough::Manhattan,
            'X' => Borough::Bronx,
            'K' => Borough::Brooklyn,
            'R' => Borough::StatenIsland,
            'Q' => Borough::Queens,
            _ => Borough::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Borough::Manhattan => "Manhattan",
            Borough::Bronx => "Bronx",
            Borough::Brooklyn => "Brooklyn",
            Borough::Queens => "Queens",
            Borough::StatenIsland => "Staten Island",
            Borough::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Borough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Borough {
    type Err = ParseBoroughError;

    /// Accepts display names case-insensitively, with or without spaces
    /// (`"staten island"`, `"StatenIsland"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        Borough::NAMED
            .iter()
            .chain(std::iter::once(&Borough::Unknown))
            .find(|b| b.name().replace(' ', "").to_ascii_lowercase() == key)
            .copied()
            .ok_or_else(|| ParseBoroughError(s.to_string()))
    }
}

/// A grade level column in the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Grade {
    PreK,
    K,
    Grade1,
    Grade2,
    Grade3,
    Grade4,
    Grade5,
    Grade6,
    Grade7,
    Grade8,
    Grade9,
    Grade10,
    Grade11,
    Grade12,
}

impl Grade {
    pub const ALL: [Grade; 14] = [
        Grade::PreK,
        Grade::K,
        Grade::Grade1,
        Grade::Grade2,
        Grade::Grade3,
        Grade::Grade4,
        Grade::Grade5,
        Grade::Grade6,
        Grade::Grade7,
        Grade::Grade8,
        Grade::Grade9,
        Grade::Grade10,
        Grade::Grade11,
        Grade::Grade12,
    ];

    /// Column header in the source CSV.
    pub fn column(&self) -> &'static str {
        match self {
            Grade::PreK => "prek",
            Grade::K => "k",
            Grade::Grade1 => "grade1",
            Grade::Grade2 => "grade2",
            Grade::Grade3 => "grade3",
            Grade::Grade4 => "grade4",
            Grade::Grade5 => "grade5",
            Grade::Grade6 => "grade6",
            Grade::Grade7 => "grade7",
            Grade::Grade8 => "grade8",
            Grade::Grade9 => "grade9",
            Grade::Grade10 => "grade10",
            Grade::Grade11 => "grade11",
            Grade::Grade12 => "grade12",
        }
    }

    /// Label shown in the "Offering" line of the school details card.
    pub fn label(&self) -> &'static str {
        match self {
            Grade::PreK => "Prek",
            Grade::K => "K",
            Grade::Grade1 => "Grade1",
            Grade::Grade2 => "Grade2",
            Grade::Grade3 => "Grade3",
            Grade::Grade4 => "Grade4",
            Grade::Grade5 => "Grade5",
            Grade::Grade6 => "Grade6",
            Grade::Grade7 => "Grade7",
            Grade::Grade8 => "Grade8",
            Grade::Grade9 => "Grade9",
            Grade::Grade10 => "Grade10",
            Grade::Grade11 => "Grade11",
            Grade::Grade12 => "Grade12",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Enrollment per grade level, indexed by [`Grade`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradeCounts([Option<u64>; 14]);

impl GradeCounts {
    pub fn new(counts: [Option<u64>; 14]) -> Self {
        Self(counts)
    }

    pub fn get(&self, grade: Grade) -> Option<u64> {
        self.0[grade.index()]
    }

    /// Grades whose count is numeric and positive.
    pub fn offered(&self) -> impl Iterator<Item = Grade> + '_ {
        Grade::ALL
            .into_iter()
            .filter(|g| self.get(*g).unwrap_or(0) > 0)
    }
}

/// Racial groups tracked by the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Race {
    #[serde(rename = "Asian American")]
    Asian,
    #[serde(rename = "African American")]
    Black,
    #[serde(rename = "Hispanic American")]
    Hispanic,
    #[serde(rename = "Caucasian American")]
    White,
}

/// One school in one school year, after cleaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchoolRecord {
    pub dbn: String,
    pub name: String,
    pub school_year: String,

    pub total_enrollment: Option<u64>,
    pub female_count: Option<u64>,
    pub male_count: Option<u64>,
    pub asian_count: Option<u64>,
    pub black_count: Option<u64>,
    pub hispanic_count: Option<u64>,
    pub white_count: Option<u64>,

    pub free_or_reduced_lunch_percent: Option<f64>,

    pub school_district: u32,
    pub borough: Borough,
    pub grades: GradeCounts,
}

impl SchoolRecord {
    pub fn race_count(&self, race: Race) -> Option<u64> {
        match race {
            Race::Asian => self.asian_count,
            Race::Black => self.black_count,
            Race::Hispanic => self.hispanic_count,
            Race::White => self.white_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borough_codes() {
        assert_eq!(Borough::from_code('M'), Borough::Manhattan);
        assert_eq!(Borough::from_code('X'), Borough::Bronx);
        assert_eq!(Borough::from_code('K'), Borough::Brooklyn);
        assert_eq!(Borough::from_code('R'), Borough::StatenIsland);
        assert_eq!(Borough::from_code('Q'), Borough::Queens);
    }

    #[test]
    fn test_unrecognised_code_is_unknown() {
        for code in ['Z', 'm', '1', ' '] {
            assert_eq!(Borough::from_code(code), Borough::Unknown);
        }
    }

    #[test]
    fn test_borough_from_str() {
        assert_eq!("Queens".parse::<Borough>(), Ok(Borough::Queens));
        assert_eq!("staten island".parse::<Borough>(), Ok(Borough::StatenIsland));
        assert_eq!("StatenIsland".parse::<Borough>(), Ok(Borough::StatenIsland));
        assert_eq!("unknown".parse::<Borough>(), Ok(Borough::Unknown));
        assert!("Jersey".parse::<Borough>().is_err());
    }

    #[test]
    fn test_borough_serializes_display_name() {
        let json = serde_json::to_string(&Borough::StatenIsland).unwrap();
        assert_eq!(json, "\"Staten Island\"");
    }

    #[test]
    fn test_grade_offered_treats_missing_as_zero() {
        let mut counts = [None; 14];
        counts[Grade::PreK as usize] = Some(0);
        counts[Grade::K as usize] = Some(5);
        counts[Grade::Grade2 as usize] = Some(3);
        let grades = GradeCounts::new(counts);

        let offered: Vec<_> = grades.offered().collect();
        assert_eq!(offered, vec![Grade::K, Grade::Grade2]);
    }
}
