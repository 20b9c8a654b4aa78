use std::{env, path::PathBuf};

pub const REPORT_DIR_VAR: &str = "HCSV_REPORT_DIR";
pub const SERVER_VAR: &str = "HCSV_SERVER";

const DEFAULT_REPORT_DIR: &str = "report";
const DEFAULT_SERVER: &str = "localhost";

/// Where the collection scripts left their CSV output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding `<server><suffix>.csv` files.
    pub report_dir: PathBuf,
    /// Server name the scripts prefix every file with.
    pub server: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            server: DEFAULT_SERVER.to_string(),
        }
    }
}

impl Settings {
    /// Read `HCSV_REPORT_DIR` and `HCSV_SERVER`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            report_dir: non_empty(REPORT_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.report_dir),
            server: non_empty(SERVER_VAR).unwrap_or(defaults.server),
        }
    }
}
