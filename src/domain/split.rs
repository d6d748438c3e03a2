// ============================================================
// Layer 3 — Split Domain Type
// ============================================================
// The fixed set of named partitions of a dataset.
//
// Every split owns its own annotation file, example list and
// image directory, but all splits share one vocabulary.
// `Sample` is a small debugging split whose images live in the
// train image directory.
//
// Reference: Rust Book §6 (Enums and Pattern Matching)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Val,
    Sample,
}

impl Split {
    /// Every split, in the order the index build visits them
    pub const ALL: [Split; 3] = [Split::Train, Split::Val, Split::Sample];

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Sample => "sample",
        }
    }

    /// Name of the split whose image directory this split reads from
    pub fn image_split(&self) -> Split {
        match self {
            Split::Sample => Split::Train,
            other => *other,
        }
    }

    /// Map a train/test flag the way the data loaders ask for splits
    pub fn from_train_flag(train: bool) -> Self {
        if train {
            Split::Train
        } else {
            Split::Val
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "train" => Ok(Split::Train),
            "val" | "validation" => Ok(Split::Val),
            "sample" => Ok(Split::Sample),
            other => Err(format!("unknown split '{other}' (expected train, val or sample)")),
        }
    }
}
