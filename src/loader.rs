//! CSV loader for the school demographics snapshot.
//!
//! Reads the raw file into [`RawRow`]s without interpreting any field. Files
//! ending in `.gz` are decompressed on the fly.

use flate2::read::GzDecoder;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::LoadError;

/// Columns the loader requires. They are matched by exact name, so their
/// position in the file does not matter.
pub const REQUIRED_COLUMNS: [&str; 26] = [
    "DBN",
    "Name",
    "schoolyear",
    "total_enrollment",
    "female_num",
    "male_num",
    "asian_num",
    "black_num",
    "hispanic_num",
    "white_num",
    "fl_percent",
    "frl_percent",
    "prek",
    "k",
    "grade1",
    "grade2",
    "grade3",
    "grade4",
    "grade5",
    "grade6",
    "grade7",
    "grade8",
    "grade9",
    "grade10",
    "grade11",
    "grade12",
];

/// A single uninterpreted row of the input file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    /// 1-based line number in the source file.
    #[serde(skip)]
    pub line: u64,

    #[serde(rename = "DBN")]
    pub dbn: String,
    #[serde(rename = "Name")]
    pub name: String,
    pub schoolyear: String,

    pub total_enrollment: String,
    pub female_num: String,
    pub male_num: String,
    pub asian_num: String,
    pub black_num: String,
    pub hispanic_num: String,
    pub white_num: String,

    pub fl_percent: String,
    pub frl_percent: String,

    pub prek: String,
    pub k: String,
    pub grade1: String,
    pub grade2: String,
    pub grade3: String,
    pub grade4: String,
    pub grade5: String,
    pub grade6: String,
    pub grade7: String,
    pub grade8: String,
    pub grade9: String,
    pub grade10: String,
    pub grade11: String,
    pub grade12: String,
}

impl RawRow {
    /// Raw grade cells in [`Grade::ALL`](crate::model::Grade::ALL) order.
    pub fn grade_cells(&self) -> [&str; 14] {
        [
            &self.prek,
            &self.k,
            &self.grade1,
            &self.grade2,
            &self.grade3,
            &self.grade4,
            &self.grade5,
            &self.grade6,
            &self.grade7,
            &self.grade8,
            &self.grade9,
            &self.grade10,
            &self.grade11,
            &self.grade12,
        ]
    }
}

/// Opens `path` and reads every row.
///
/// # Errors
///
/// Returns [`LoadError`] if the file is missing, unreadable, lacks a required
/// column, or contains a row with the wrong number of fields.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_rows(path: &Path) -> Result<Vec<RawRow>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let gzipped = path.extension().and_then(|e| e.to_str()) == Some("gz");
    debug!(gzipped, "Opened dataset");

    let rows = if gzipped {
        read_rows(GzDecoder::new(file))?
    } else {
        read_rows(file)?
    };

    info!(rows = rows.len(), "Dataset loaded");
    Ok(rows)
}

/// Reads rows from any CSV source with a header line.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>, LoadError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    check_headers(&headers)?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row: RawRow = record.deserialize(Some(&headers))?;
        row.line = record.position().map(|p| p.line()).unwrap_or_default();
        rows.push(row);
    }

    Ok(rows)
}

/// Ensures every required column is present exactly once. Other columns are
/// ignored.
fn check_headers(headers: &csv::StringRecord) -> Result<(), LoadError> {
    for column in REQUIRED_COLUMNS {
        match headers.iter().filter(|h| *h == column).count() {
            0 => return Err(LoadError::MissingColumn(column)),
            1 => {}
            _ => return Err(LoadError::DuplicateColumn(column)),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::env;
    use std::fs;
    use std::io::Write;

    fn header_line() -> String {
        REQUIRED_COLUMNS.join(",")
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(name)
    }

    fn sample_csv() -> String {
        format!(
            "{}\n07X123, PS 1 ,20052006,100,50,50,10,20,30,40,10,5,0,5,,3,0,0,0,0,0,0,0,0,0,0\n",
            header_line()
        )
    }

    #[test]
    fn test_missing_file() {
        let result = load_rows(Path::new("definitely_not_here.csv"));
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }

    #[test]
    fn test_reads_rows_with_line_numbers() {
        let rows = read_rows(sample_csv().as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].dbn, "07X123");
        assert_eq!(rows[0].name, " PS 1 ");
        assert_eq!(rows[0].grade1, "");
        assert_eq!(rows[0].line, 2);
    }

    #[test]
    fn test_missing_column_rejected() {
        let csv = "DBN,Name,schoolyear\n01M015,PS 15,20052006\n";
        let result = read_rows(csv.as_bytes());
        assert!(matches!(
            result,
            Err(LoadError::MissingColumn("total_enrollment"))
        ));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let csv = format!("{},k\n", header_line());
        let result = read_rows(csv.as_bytes());
        assert!(matches!(result, Err(LoadError::DuplicateColumn("k"))));
    }

    #[test]
    fn test_snapshot_column_order_accepted() {
        // column order of the published snapshot file
        let header = "DBN,Name,schoolyear,fl_percent,frl_percent,total_enrollment,prek,k,\
            grade1,grade2,grade3,grade4,grade5,grade6,grade7,grade8,grade9,grade10,grade11,\
            grade12,ell_num,asian_num,black_num,hispanic_num,white_num,male_num,female_num";
        let csv = format!(
            "{}\n01M015,P.S. 015 ROBERTO CLEMENTE,20052006,89.4,,281,15,36,40,33,38,52,\
             29,38,,,,,,,36,10,74,189,5,158,123\n",
            header
        );

        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].fl_percent, "89.4");
        assert_eq!(rows[0].total_enrollment, "281");
        assert_eq!(rows[0].male_num, "158");
        assert_eq!(rows[0].female_num, "123");
    }

    #[test]
    fn test_extra_columns_ignored() {
        let header = format!("Extra,{},Trailing", header_line());
        // 22 empty cells between total_enrollment and the trailing column
        let csv = format!(
            "{}\nx,01M015,PS 15,20052006,250{}y\n",
            header,
            ",".repeat(23)
        );

        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].dbn, "01M015");
        assert_eq!(rows[0].total_enrollment, "250");
    }

    #[test]
    fn test_wrong_field_count_is_malformed() {
        let csv = format!("{}\n01M015,PS 15\n", header_line());
        let result = read_rows(csv.as_bytes());
        assert!(matches!(result, Err(LoadError::Csv { .. })));
    }

    #[test]
    fn test_load_plain_file() {
        let path = temp_path("school_explorer_loader_plain.csv");
        fs::write(&path, sample_csv()).unwrap();

        let rows = load_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_gzip_file() {
        let path = temp_path("school_explorer_loader.csv.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(sample_csv().as_bytes()).unwrap();
        fs::write(&path, encoder.finish().unwrap()).unwrap();

        let rows = load_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].schoolyear, "20052006");

        fs::remove_file(&path).unwrap();
    }
}
