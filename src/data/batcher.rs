// ============================================================
// Layer 4 — Batchers
// ============================================================
// Implements Burn's Batcher trait for both datasets, turning a
// Vec of items into tensors with a leading batch dimension.
//
// CLEVR questions have different lengths, so the CLEVR batcher:
//   1. sorts the items by question length, longest first
//   2. pads every question with PAD (0) up to the longest one
//   3. records the true lengths so a recurrent encoder can
//      ignore the padding
//
//   Input:  N items, question lengths L1 >= L2 >= ... >= LN
//   Output: questions [N, L1], question_lengths [N],
//           images [N, 3, H, W], answers [N]
//
// Sort-of-CLEVR questions are always [attribute, type], so that
// batcher just stacks.
//
// The datasets hand Burn `Option<Item>`: a slot whose image or
// question could not be decoded arrives as None and is dropped
// here, so one bad item shrinks its batch instead of ending the
// epoch. A batch whose every slot failed has a leading dim of 0.
//
// All images of a batch must share one shape; the CLEVR data
// loaders guarantee this by resizing on load.
//
// Reference: Burn Book §4 (Batcher)

use std::cmp::Reverse;

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::data::clevr_dataset::ClevrItem;
use crate::data::sort_of_clevr::SortOfClevrItem;
use crate::domain::image::ImageArray;
use crate::domain::vocabulary::PAD_ID;

// ─── ClevrBatch ───────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct ClevrBatch<B: Backend> {
    /// shape: [batch_size, 3, height, width]
    pub images: Tensor<B, 4>,

    /// shape: [batch_size, longest_question], PAD-filled
    pub questions: Tensor<B, 2, Int>,

    /// shape: [batch_size], length of each question including SOS/EOS
    pub question_lengths: Tensor<B, 1, Int>,

    /// shape: [batch_size]
    pub answers: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug)]
pub struct ClevrBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ClevrBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Collate already-decoded items into one batch
    pub fn collate(&self, mut items: Vec<ClevrItem>) -> ClevrBatch<B> {
        // Longest question first (stable, so ties keep dataset order)
        items.sort_by_key(|item| Reverse(item.question.len()));

        let batch_size = items.len();
        let max_len    = items.first().map_or(0, |i| i.question.len());

        let mut question_flat = Vec::with_capacity(batch_size * max_len);
        for item in &items {
            question_flat.extend(item.question.iter().map(|&id| id as i32));
            question_flat.extend(std::iter::repeat(PAD_ID as i32).take(max_len - item.question.len()));
        }

        let lengths: Vec<i32> = items.iter().map(|i| i.question.len() as i32).collect();
        let answers: Vec<i32> = items.iter().map(|i| i.answer as i32).collect();

        let questions = Tensor::<B, 1, Int>::from_ints(
            question_flat.as_slice(), &self.device
        ).reshape([batch_size, max_len]);

        ClevrBatch {
            images:           stack_images::<B>(&items.iter().map(|i| &i.image).collect::<Vec<_>>(), &self.device),
            questions,
            question_lengths: Tensor::<B, 1, Int>::from_ints(lengths.as_slice(), &self.device),
            answers:          Tensor::<B, 1, Int>::from_ints(answers.as_slice(), &self.device),
        }
    }
}

impl<B: Backend> Batcher<Option<ClevrItem>, ClevrBatch<B>> for ClevrBatcher<B> {
    fn batch(&self, items: Vec<Option<ClevrItem>>) -> ClevrBatch<B> {
        self.collate(items.into_iter().flatten().collect())
    }
}

// ─── SortOfClevrBatch ─────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct SortOfClevrBatch<B: Backend> {
    /// shape: [batch_size, 3, height, width]
    pub images: Tensor<B, 4>,

    /// shape: [batch_size, 2] — (attribute_id, type_id) per row
    pub questions: Tensor<B, 2, Int>,

    /// shape: [batch_size]
    pub answers: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug)]
pub struct SortOfClevrBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SortOfClevrBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Collate already-decoded items into one batch
    pub fn collate(&self, items: Vec<SortOfClevrItem>) -> SortOfClevrBatch<B> {
        let batch_size = items.len();

        let questions: Vec<i32> = items
            .iter()
            .flat_map(|i| i.question.iter().map(|&q| q as i32))
            .collect();
        let answers: Vec<i32> = items.iter().map(|i| i.answer as i32).collect();

        SortOfClevrBatch {
            images:    stack_images::<B>(&items.iter().map(|i| &i.image).collect::<Vec<_>>(), &self.device),
            questions: Tensor::<B, 1, Int>::from_ints(questions.as_slice(), &self.device)
                .reshape([batch_size, 2]),
            answers:   Tensor::<B, 1, Int>::from_ints(answers.as_slice(), &self.device),
        }
    }
}

impl<B: Backend> Batcher<Option<SortOfClevrItem>, SortOfClevrBatch<B>> for SortOfClevrBatcher<B> {
    fn batch(&self, items: Vec<Option<SortOfClevrItem>>) -> SortOfClevrBatch<B> {
        self.collate(items.into_iter().flatten().collect())
    }
}

/// Stack channel-first images into one [N, C, H, W] float tensor.
///
/// # Panics
/// Panics if the images do not all have the same shape. Sort-of-CLEVR
/// artifacts are checked for this on load; CLEVR images are resized.
fn stack_images<B: Backend>(images: &[&ImageArray], device: &B::Device) -> Tensor<B, 4> {
    let mut shape: Option<[usize; 3]> = None;
    let mut flat = Vec::new();

    for img in images {
        let s = *shape.get_or_insert(img.shape());
        assert_eq!(
            s,
            img.shape(),
            "images in one batch must share a shape; configure a resize"
        );
        flat.extend_from_slice(&img.data);
    }

    let [c, h, w] = shape.unwrap_or([0, 0, 0]);
    Tensor::<B, 4>::from_data(TensorData::new(flat, [images.len(), c, h, w]), device)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use crate::domain::vocabulary::{EOS_ID, SOS_ID};

    type TestBackend = NdArray;

    fn image(value: u8) -> ImageArray {
        ImageArray::from_hwc_u8(2, 2, 3, &[value; 12]).unwrap()
    }

    fn clevr_item(words: &[u32], answer: u32) -> ClevrItem {
        let mut question = vec![SOS_ID];
        question.extend_from_slice(words);
        question.push(EOS_ID);
        ClevrItem { image: image(0), question, answer }
    }

    #[test]
    fn test_clevr_batch_sorts_and_pads() {
        let batcher = ClevrBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.collate(vec![
            clevr_item(&[5], 0),
            clevr_item(&[7, 8, 9], 1),
            clevr_item(&[], 2),
        ]);

        assert_eq!(batch.questions.dims(), [3, 5]);
        assert_eq!(batch.images.dims(), [3, 3, 2, 2]);

        let questions: Vec<i64> = batch.questions.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(questions, vec![
            1, 7, 8, 9, 2,
            1, 5, 2, 0, 0,
            1, 2, 0, 0, 0,
        ]);

        let lengths: Vec<i64> = batch.question_lengths.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(lengths, vec![5, 3, 2]);

        // answers follow their questions through the sort
        let answers: Vec<i64> = batch.answers.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(answers, vec![1, 0, 2]);
    }

    #[test]
    fn test_sort_of_clevr_batch_shapes() {
        let batcher = SortOfClevrBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.collate(vec![
            SortOfClevrItem { image: image(255), question: [2, 5], answer: 1 },
            SortOfClevrItem { image: image(0),   question: [0, 3], answer: 4 },
        ]);

        assert_eq!(batch.images.dims(), [2, 3, 2, 2]);
        assert_eq!(batch.questions.dims(), [2, 2]);

        let questions: Vec<i64> = batch.questions.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(questions, vec![2, 5, 0, 3]);

        let pixels: Vec<f32> = batch.images.into_data().convert::<f32>().to_vec().unwrap();
        assert!(pixels[..12].iter().all(|&v| v == 1.0));
        assert!(pixels[12..].iter().all(|&v| v == 0.0));
    }

    #[test]
    #[should_panic]
    fn test_mixed_image_shapes_panic() {
        let batcher = SortOfClevrBatcher::<TestBackend>::new(Default::default());
        let small   = ImageArray::from_hwc_u8(1, 1, 3, &[0; 3]).unwrap();
        let _ = batcher.collate(vec![
            SortOfClevrItem { image: image(0), question: [0, 0], answer: 0 },
            SortOfClevrItem { image: small,    question: [0, 0], answer: 0 },
        ]);
    }

    #[test]
    fn test_failed_slots_are_dropped_from_the_batch() {
        let batcher = ClevrBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.batch(vec![
            Some(clevr_item(&[5], 3)),
            None,
            Some(clevr_item(&[6, 7], 4)),
        ]);

        assert_eq!(batch.questions.dims(), [2, 4]);
        let answers: Vec<i64> = batch.answers.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(answers, vec![4, 3]);
    }

    #[test]
    fn test_all_slots_failed_gives_empty_batch() {
        let batcher = SortOfClevrBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.batch(vec![None, None]);
        assert_eq!(batch.answers.dims(), [0]);
        assert_eq!(batch.images.dims()[0], 0);
    }
}
