// ============================================================
// Layer 4 — Data Loaders
// ============================================================
// Wires a dataset view and its batcher into Burn's DataLoader,
// the object an external training loop iterates over.
//
//   DataConfig ──► open split ──► Batcher ──► DataLoaderBuilder
//                                   │
//                     batch_size, shuffle(seed), num_workers
//
// Both train and test loaders shuffle. CLEVR images are resized
// to (input_h, input_w) on load so every batch stacks cleanly.
//
// The loader is returned together with the label sizes a model
// needs to size its embedding and output layers.
//
// Reference: Burn Book §4 (DataLoader)

use std::sync::Arc;

use anyhow::{Context, Result};
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    prelude::*,
};

use crate::application::config::{DataConfig, DatasetKind};
use crate::data::batcher::{ClevrBatch, ClevrBatcher, SortOfClevrBatch, SortOfClevrBatcher};
use crate::data::clevr_dataset::ClevrDataset;
use crate::data::sort_of_clevr::SortOfClevrDataset;
use crate::domain::split::Split;
use crate::infra::image_loader::RgbImageLoader;

/// Vocabulary / label sizes of the loaded dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSizes {
    /// Question vocabulary size (CLEVR) or question-type count (Sort-of-CLEVR)
    pub q_size: usize,
    pub a_size: usize,
    /// Color count; Sort-of-CLEVR only
    pub c_size: Option<usize>,
}

pub enum VqaBatches<B: Backend> {
    Clevr(Arc<dyn DataLoader<ClevrBatch<B>>>),
    SortOfClevr(Arc<dyn DataLoader<SortOfClevrBatch<B>>>),
}

pub struct VqaLoader<B: Backend> {
    pub batches: VqaBatches<B>,
    pub sizes:   LabelSizes,
    /// Number of examples (not batches) in the split
    pub len:     usize,
}

/// Loader over the training split of the configured dataset
pub fn train_loader<B: Backend>(cfg: &DataConfig, device: B::Device) -> Result<VqaLoader<B>> {
    loader(cfg, Split::from_train_flag(true), device)
}

/// Loader over the validation split of the configured dataset
pub fn test_loader<B: Backend>(cfg: &DataConfig, device: B::Device) -> Result<VqaLoader<B>> {
    loader(cfg, Split::from_train_flag(false), device)
}

pub fn loader<B: Backend>(cfg: &DataConfig, split: Split, device: B::Device) -> Result<VqaLoader<B>> {
    match cfg.dataset {
        DatasetKind::Clevr       => clevr_loader(cfg, split, device),
        DatasetKind::SortOfClevr => sort_of_clevr_loader(cfg, split, device),
    }
}

fn clevr_loader<B: Backend>(cfg: &DataConfig, split: Split, device: B::Device) -> Result<VqaLoader<B>> {
    let root    = cfg.clevr_root();
    let images  = Arc::new(RgbImageLoader::with_resize(cfg.input_h, cfg.input_w));
    let dataset = ClevrDataset::open(&root, split, images).with_context(|| {
        format!("Cannot open CLEVR split '{split}' under '{}'. Have you run 'build-index'?", root.display())
    })?;

    let sizes = LabelSizes { q_size: dataset.q_size(), a_size: dataset.a_size(), c_size: None };
    let len   = dataset.len();

    let mut builder = DataLoaderBuilder::new(ClevrBatcher::<B>::new(device))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.shuffle_seed);
    if cfg.num_workers > 0 {
        builder = builder.num_workers(cfg.num_workers);
    }

    tracing::info!("CLEVR '{}' loader: {} examples, batch size {}", split, len, cfg.batch_size);
    Ok(VqaLoader { batches: VqaBatches::Clevr(builder.build(dataset)), sizes, len })
}

fn sort_of_clevr_loader<B: Backend>(cfg: &DataConfig, split: Split, device: B::Device) -> Result<VqaLoader<B>> {
    let dir     = cfg.sort_of_clevr_dir();
    let dataset = SortOfClevrDataset::open(&dir, split)
        .with_context(|| format!("Cannot open Sort-of-CLEVR split '{split}' under '{}'", dir.display()))?;

    let sizes = LabelSizes {
        q_size: dataset.q_size(),
        a_size: dataset.a_size(),
        c_size: Some(dataset.c_size()),
    };
    let len = dataset.len();

    let mut builder = DataLoaderBuilder::new(SortOfClevrBatcher::<B>::new(device))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.shuffle_seed);
    if cfg.num_workers > 0 {
        builder = builder.num_workers(cfg.num_workers);
    }

    tracing::info!("Sort-of-CLEVR '{}' loader: {} examples, batch size {}", split, len, cfg.batch_size);
    Ok(VqaLoader { batches: VqaBatches::SortOfClevr(builder.build(dataset)), sizes, len })
}
