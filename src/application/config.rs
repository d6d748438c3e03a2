// ============================================================
// Layer 2 — Data Configuration
// ============================================================
// Every dataset-selection and size parameter of a run, as one
// typed value. The CLI converts its arguments into this struct
// (see cli/commands.rs) and nothing below Layer 2 ever sees clap.
//
// Directory conventions derived from the config:
//
//   <data_directory>/clevr/                       ← CLEVR root
//   <data_directory>/sortofclevr/<generation>/    ← Sort-of-CLEVR
//
// where <generation> joins the generator parameters with '_',
// e.g. "9800_200_75_5_3" for the defaults.
//
// Serialisable so a run can record exactly what it loaded.
//
// Reference: Rust Book §5 (Structs), serde derive documentation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetKind {
    Clevr,
    SortOfClevr,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Clevr       => "clevr",
            DatasetKind::SortOfClevr => "sort-of-clevr",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clevr" => Ok(DatasetKind::Clevr),
            "sort-of-clevr" | "sortofclevr" => Ok(DatasetKind::SortOfClevr),
            other => Err(format!("unknown dataset '{other}' (expected clevr or sort-of-clevr)")),
        }
    }
}

/// Parameters the Sort-of-CLEVR generator was run with.
/// They only select which generated directory to read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOfClevrConfig {
    pub train_size:  usize,
    pub test_size:   usize,
    pub image_size:  usize,
    pub object_size: usize,
    pub closest:     usize,
}

impl SortOfClevrConfig {
    /// Directory name of one generated dataset, e.g. "9800_200_75_5_3"
    pub fn directory_name(&self) -> String {
        [self.train_size, self.test_size, self.image_size, self.object_size, self.closest]
            .map(|n| n.to_string())
            .join("_")
    }
}

impl Default for SortOfClevrConfig {
    fn default() -> Self {
        Self {
            train_size:  9800,
            test_size:   200,
            image_size:  75,
            object_size: 5,
            closest:     3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    pub dataset:        DatasetKind,
    pub data_directory: String,
    pub batch_size:     usize,
    pub shuffle_seed:   u64,
    /// 0 loads batches on the calling thread
    pub num_workers:    usize,
    /// CLEVR images are resized to (input_h, input_w)
    pub input_h:        u32,
    pub input_w:        u32,
    pub sort_of_clevr:  SortOfClevrConfig,
}

impl DataConfig {
    pub fn clevr_root(&self) -> PathBuf {
        PathBuf::from(&self.data_directory).join("clevr")
    }

    pub fn sort_of_clevr_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_directory)
            .join("sortofclevr")
            .join(self.sort_of_clevr.directory_name())
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset:        DatasetKind::Clevr,
            data_directory: "data".to_string(),
            batch_size:     64,
            shuffle_seed:   1,
            num_workers:    0,
            input_h:        75,
            input_w:        75,
            sort_of_clevr:  SortOfClevrConfig::default(),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_directories() {
        let cfg = DataConfig::default();
        assert_eq!(cfg.clevr_root(), Path::new("data/clevr"));
        assert_eq!(cfg.sort_of_clevr_dir(), Path::new("data/sortofclevr/9800_200_75_5_3"));
    }

    #[test]
    fn test_dataset_kind_parsing() {
        assert_eq!("sortofclevr".parse::<DatasetKind>(), Ok(DatasetKind::SortOfClevr));
        assert_eq!("CLEVR".parse::<DatasetKind>(), Ok(DatasetKind::Clevr));
        assert!("mnist".parse::<DatasetKind>().is_err());
    }

    #[test]
    fn test_config_json_roundtrip() {
        let cfg  = DataConfig { dataset: DatasetKind::SortOfClevr, ..DataConfig::default() };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"sort-of-clevr\""));
        assert_eq!(serde_json::from_str::<DataConfig>(&json).unwrap(), cfg);
    }
}
