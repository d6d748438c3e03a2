// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Opens one split of a prepared dataset and renders a single
// item in human-readable form: the question decoded back into
// words (or color + question type for Sort-of-CLEVR), the answer
// label, and the decoded image shape.
//
// Useful as a smoke test after `build-index` and to check that
// a downloaded image directory matches its index.
//
// If no index is given a random one is picked.

use anyhow::{bail, Context, Result};
use rand::Rng;
use std::sync::Arc;

use crate::application::config::{DataConfig, DatasetKind};
use crate::data::clevr_dataset::ClevrDataset;
use crate::data::encoder::decode_question;
use crate::data::sort_of_clevr::SortOfClevrDataset;
use crate::domain::split::Split;
use crate::infra::image_loader::RgbImageLoader;

#[derive(Debug, Clone)]
pub struct InspectReport {
    pub dataset:     DatasetKind,
    pub split:       Split,
    pub len:         usize,
    pub q_size:      usize,
    pub a_size:      usize,
    pub c_size:      Option<usize>,
    pub index:       usize,
    pub question:    String,
    pub answer:      String,
    pub image_shape: [usize; 3],
}

pub struct InspectUseCase {
    config: DataConfig,
    split:  Split,
}

impl InspectUseCase {
    pub fn new(config: DataConfig, split: Split) -> Self {
        Self { config, split }
    }

    pub fn execute(&self, index: Option<usize>) -> Result<InspectReport> {
        match self.config.dataset {
            DatasetKind::Clevr       => self.inspect_clevr(index),
            DatasetKind::SortOfClevr => self.inspect_sort_of_clevr(index),
        }
    }

    fn inspect_clevr(&self, index: Option<usize>) -> Result<InspectReport> {
        let root = self.config.clevr_root();
        let ds   = ClevrDataset::open(&root, self.split, Arc::new(RgbImageLoader::new()))
            .with_context(|| format!("Cannot open CLEVR index under '{}'", root.display()))?;

        let index = pick_index(index, ds.len())?;
        let item  = ds.item(index).with_context(|| format!("Cannot load item {index}"))?;

        Ok(InspectReport {
            dataset:     DatasetKind::Clevr,
            split:       self.split,
            len:         ds.len(),
            q_size:      ds.q_size(),
            a_size:      ds.a_size(),
            c_size:      None,
            index,
            question:    decode_question(&item.question, ds.question_vocabulary()),
            answer:      label(ds.answer_vocabulary().token(item.answer), item.answer),
            image_shape: item.image.shape(),
        })
    }

    fn inspect_sort_of_clevr(&self, index: Option<usize>) -> Result<InspectReport> {
        let dir = self.config.sort_of_clevr_dir();
        let ds  = SortOfClevrDataset::open(&dir, self.split)
            .with_context(|| format!("Cannot open Sort-of-CLEVR data under '{}'", dir.display()))?;

        let index = pick_index(index, ds.len())?;
        let item  = ds.item(index).with_context(|| format!("Cannot decode item {index}"))?;
        let [color, kind] = item.question;

        let question = format!(
            "{} / {}",
            label(ds.idx_to_color().get(color as usize).map(String::as_str), color),
            label(ds.idx_to_question().get(kind as usize).map(String::as_str), kind),
        );

        Ok(InspectReport {
            dataset:     DatasetKind::SortOfClevr,
            split:       self.split,
            len:         ds.len(),
            q_size:      ds.q_size(),
            a_size:      ds.a_size(),
            c_size:      Some(ds.c_size()),
            index,
            question,
            answer:      label(ds.idx_to_answer().get(item.answer as usize).map(String::as_str), item.answer),
            image_shape: item.image.shape(),
        })
    }
}

fn pick_index(requested: Option<usize>, len: usize) -> Result<usize> {
    if len == 0 {
        bail!("the split is empty");
    }
    Ok(requested.unwrap_or_else(|| rand::thread_rng().gen_range(0..len)))
}

/// A label name, or `#id` when the id has no name
fn label(name: Option<&str>, id: u32) -> String {
    name.map_or_else(|| format!("#{id}"), str::to_string)
}
