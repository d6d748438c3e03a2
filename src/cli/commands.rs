// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `build-index` and `inspect`,
// and all their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use vqa_data::application::config::{DataConfig, DatasetKind, SortOfClevrConfig};
use vqa_data::domain::split::Split;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the CLEVR question files once and persist the encoded index
    BuildIndex(BuildIndexArgs),

    /// Load a prepared split and print one decoded item
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
pub struct BuildIndexArgs {
    /// Directory that contains the `clevr/` dataset root
    #[arg(long, default_value = "data")]
    pub data_directory: String,

    /// Splits to scan; the vocabulary covers all of them
    #[arg(long = "split", default_values_t = Split::ALL.to_vec())]
    pub splits: Vec<Split>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// clevr or sort-of-clevr
    #[arg(long, default_value_t = DatasetKind::Clevr)]
    pub dataset: DatasetKind,

    #[arg(long, default_value_t = Split::Train)]
    pub split: Split,

    /// Item to show; a random one when omitted
    #[arg(long)]
    pub index: Option<usize>,

    #[arg(long, default_value = "data")]
    pub data_directory: String,

    /// Size of the generated Sort-of-CLEVR training set
    #[arg(long, default_value_t = 9800)]
    pub train_size: usize,

    /// Size of the generated Sort-of-CLEVR test set
    #[arg(long, default_value_t = 200)]
    pub test_size: usize,

    /// Side length of the generated Sort-of-CLEVR images
    #[arg(long, default_value_t = 75)]
    pub image_size: usize,

    /// Object size used by the Sort-of-CLEVR generator
    #[arg(long, default_value_t = 5)]
    pub size: usize,

    /// `closest` parameter of the Sort-of-CLEVR generator
    #[arg(long, default_value_t = 3)]
    pub closest: usize,
}

/// The boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<&InspectArgs> for DataConfig {
    fn from(a: &InspectArgs) -> Self {
        DataConfig {
            dataset:        a.dataset,
            data_directory: a.data_directory.clone(),
            sort_of_clevr:  SortOfClevrConfig {
                train_size:  a.train_size,
                test_size:   a.test_size,
                image_size:  a.image_size,
                object_size: a.size,
                closest:     a.closest,
            },
            ..DataConfig::default()
        }
    }
}
