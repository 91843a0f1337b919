//! Turns raw CSV rows into canonical [`SchoolRecord`]s.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::FormatError;
use crate::loader::RawRow;
use crate::model::{Borough, GradeCounts, SchoolRecord};

/// Identity of a row dropped during normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    pub line: u64,
    pub dbn: String,
    pub reason: String,
}

/// Normalizes every row, skipping those that cannot be cleaned.
#[tracing::instrument(skip(rows), fields(rows = rows.len()))]
pub fn normalize_all(rows: &[RawRow]) -> (Vec<SchoolRecord>, Vec<SkippedRow>) {
    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();

    for row in rows {
        match normalize_row(row) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(line = row.line, dbn = %row.dbn, error = %e, "Skipping row");
                skipped.push(SkippedRow {
                    line: row.line,
                    dbn: row.dbn.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    debug!(
        records = records.len(),
        skipped = skipped.len(),
        "Normalization finished"
    );
    (records, skipped)
}

/// Cleans a single row.
///
/// # Errors
///
/// Returns [`FormatError`] if the school year cannot be reformatted, the DBN
/// is too short or lacks a numeric district, or the trimmed name is empty.
pub fn normalize_row(row: &RawRow) -> Result<SchoolRecord, FormatError> {
    let dbn = row.dbn.trim();
    let school_district = district_of(dbn)?;
    let borough = borough_of(dbn)?;

    let name = row.name.trim();
    if name.is_empty() {
        return Err(FormatError::EmptyName);
    }

    let school_year = format_school_year(&row.schoolyear)?;

    let grade_cells = row.grade_cells();
    let grades = GradeCounts::new(std::array::from_fn(|i| parse_count(grade_cells[i])));

    Ok(SchoolRecord {
        dbn: dbn.to_string(),
        name: name.to_string(),
        school_year,
        total_enrollment: parse_count(&row.total_enrollment),
        female_count: parse_count(&row.female_num),
        male_count: parse_count(&row.male_num),
        asian_count: parse_count(&row.asian_num),
        black_count: parse_count(&row.black_num),
        hispanic_count: parse_count(&row.hispanic_num),
        white_count: parse_count(&row.white_num),
        free_or_reduced_lunch_percent: lunch_percent(&row.fl_percent, &row.frl_percent),
        school_district,
        borough,
        grades,
    })
}

/// Rewrites `YYYYYYYY` as `YYYY-YYYY` by inserting a hyphen after the fourth
/// character.
pub fn format_school_year(raw: &str) -> Result<String, FormatError> {
    let raw = raw.trim();
    match raw.char_indices().nth(4) {
        Some((split, _)) => Ok(format!("{}-{}", &raw[..split], &raw[split..])),
        None => Err(FormatError::SchoolYear(raw.to_string())),
    }
}

/// District number from the first two characters of a DBN (`"07X123"` → 7).
pub fn district_of(dbn: &str) -> Result<u32, FormatError> {
    let code: String = dbn.chars().take(2).collect();
    if code.chars().count() < 2 {
        return Err(FormatError::ShortDbn(dbn.to_string()));
    }
    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(FormatError::District(dbn.to_string()));
    }
    code.parse::<u32>()
        .map_err(|_| FormatError::District(dbn.to_string()))
}

/// Borough encoded by the third character of a DBN.
pub fn borough_of(dbn: &str) -> Result<Borough, FormatError> {
    dbn.chars()
        .nth(2)
        .map(Borough::from_code)
        .ok_or_else(|| FormatError::ShortDbn(dbn.to_string()))
}

/// Combines the two lunch columns by string concatenation, then parses the
/// result. `"10"` and `"5"` give `105.0`, not `15.0`.
pub fn lunch_percent(fl_percent: &str, frl_percent: &str) -> Option<f64> {
    let combined: String = fl_percent
        .chars()
        .chain(frl_percent.chars())
        .filter(|c| !c.is_whitespace())
        .collect();
    parse_number(&combined)
}

/// Parses a non-negative count. Blank or non-numeric cells are missing.
/// Whole-valued decimals such as `"12.0"` are accepted; signs, exponents and
/// values past `u64::MAX` are not.
pub fn parse_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
    if whole.is_empty()
        || !whole.bytes().all(|b| b.is_ascii_digit())
        || !fraction.bytes().all(|b| b == b'0')
    {
        return None;
    }
    whole.parse().ok()
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}
