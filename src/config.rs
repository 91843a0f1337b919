use std::path::PathBuf;

pub const DEFAULT_DATASET: &str = "2006_-_2012_School_Demographics_and_Accountability_Snapshot.csv";
pub const DEFAULT_LOG_FILE: &str = "logs/school_explorer.log";

/// Runtime settings read from the environment (and `.env`, loaded by the binary).
///
/// | Variable           | Default                                                     |
/// |--------------------|-------------------------------------------------------------|
/// | `SCHOOL_DATA_PATH` | `2006_-_2012_School_Demographics_and_Accountability_Snapshot.csv` |
/// | `LOG_FILE_PATH`    | `logs/school_explorer.log`                                  |
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerConfig {
    pub dataset_path: PathBuf,
    pub log_file_path: PathBuf,
}

impl ExplorerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| -> PathBuf {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
                .into()
        };

        Self {
            dataset_path: var("SCHOOL_DATA_PATH", DEFAULT_DATASET),
            log_file_path: var("LOG_FILE_PATH", DEFAULT_LOG_FILE),
        }
    }

    /// Replaces the dataset path when one was given on the command line.
    pub fn with_dataset(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.dataset_path = path;
        }
        self
    }
}
