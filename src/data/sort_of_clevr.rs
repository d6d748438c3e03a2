// ============================================================
// Layer 4 — Sort-of-CLEVR Synthetic Feature Decoder
// ============================================================
// Sort-of-CLEVR questions are not text. The generator stores each
// question as a one-hot feature vector made of three segments:
//
//   position:  0 ............ 5 | 6 ...... 7 | 8 ...........
//   segment:   attribute (color)| kind       | question type
//
//   attribute — which colored object the question is about
//   kind      — relational / non-relational flag
//   type      — which question of that kind is asked
//
// Decoding turns a vector into a compact pair
//   [attribute_id, type_id]
// where
//   attribute_id = active position inside the attribute segment
//   type_id      = active position inside the type segment - offset
//
// The offset depends on the group: non-relational questions use 8,
// relational ones use 5, which maps both groups onto one dense
// range of question-type ids (0..3 non-relational, 3.. relational).
// The kind bit only tells the groups apart and is dropped.
//
// Every scene carries G1 non-relational and G2 relational questions
// (18 + 30 = 48 by default). A flat index picks a scene and then
// one slot:
//
//   local = index % (G1 + G2)
//   local <  G1  → non_relational[local]
//   local >= G1  → relational[local - G1]
//
// Images are stored channel-last as u8 and returned channel-first
// as f32 in [0, 1].
//
// Reference: Santoro et al. (2017) A simple neural network module
//            for relational reasoning (Sort-of-CLEVR)
//            Burn Book §4 (Datasets)

use std::fs;
use std::io::ErrorKind;
use std::ops::Range;
use std::path::{Path, PathBuf};

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::error::{DatasetError, DatasetResult};
use crate::domain::image::ImageArray;
use crate::domain::split::Split;

// ─── Layout ───────────────────────────────────────────────────────────────────
/// Boundaries of the segments inside a question feature vector.
/// The attribute segment starts at 0, the kind segment follows it,
/// and the type segment runs from there to the end of the vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneHotLayout {
    pub attribute_len: usize,
    pub kind_len:      usize,
}

impl OneHotLayout {
    pub fn attribute_segment(&self) -> Range<usize> {
        0..self.attribute_len
    }

    pub fn kind_segment(&self) -> Range<usize> {
        self.attribute_len..self.type_start()
    }

    pub fn type_start(&self) -> usize {
        self.attribute_len + self.kind_len
    }
}

impl Default for OneHotLayout {
    fn default() -> Self {
        Self { attribute_len: 6, kind_len: 2 }
    }
}

/// Size of a question group and the offset that turns its type
/// position into a compact question-type id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub count:       usize,
    pub type_offset: usize,
}

pub const NON_RELATIONAL: GroupSpec = GroupSpec { count: 18, type_offset: 8 };
pub const RELATIONAL: GroupSpec     = GroupSpec { count: 30, type_offset: 5 };

fn default_non_relational() -> GroupSpec { NON_RELATIONAL }
fn default_relational() -> GroupSpec { RELATIONAL }

// ─── Stored records ───────────────────────────────────────────────────────────
/// A scene image as the generator stores it: channel-last u8
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneImage {
    pub height:   usize,
    pub width:    usize,
    pub channels: usize,
    pub pixels:   Vec<u8>,
}

/// Parallel lists of one-hot question vectors and answer codes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuestionGroup {
    pub questions: Vec<Vec<u8>>,
    pub answers:   Vec<u32>,
}

impl QuestionGroup {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub image:          SceneImage,
    pub relational:     QuestionGroup,
    pub non_relational: QuestionGroup,
}

/// Contents of `sort-of-clevr-<split>.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortOfClevrArtifact {
    pub colors:         Vec<String>,
    pub question_types: Vec<String>,
    pub answers:        Vec<String>,
    #[serde(default)]
    pub layout:         OneHotLayout,
    #[serde(default = "default_non_relational")]
    pub non_relational: GroupSpec,
    #[serde(default = "default_relational")]
    pub relational:     GroupSpec,
    pub scenes:         Vec<SceneRecord>,
}

impl SortOfClevrArtifact {
    pub fn file_name(split: Split) -> String {
        format!("sort-of-clevr-{}.json", split.as_str())
    }

    pub fn load(path: &Path) -> DatasetResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => DatasetError::MissingIndex { path: path.to_path_buf() },
            _ => DatasetError::Io { path: path.to_path_buf(), source },
        })?;
        serde_json::from_str(&text)
            .map_err(|source| DatasetError::Parse { path: path.to_path_buf(), source })
    }

    pub fn save(&self, path: &Path) -> DatasetResult<()> {
        let io_err = |source: std::io::Error| DatasetError::Io { path: path.to_path_buf(), source };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string(self).map_err(|e| io_err(e.into()))?;
        fs::write(path, json).map_err(io_err)
    }

    /// Check every scene against the declared group sizes and the
    /// image shape of scene 0, so every batch can be stacked.
    fn validate(&self) -> DatasetResult<()> {
        let shape = self.scenes.first().map(|r| (r.image.height, r.image.width, r.image.channels));

        for (scene, record) in self.scenes.iter().enumerate() {
            let malformed = |reason: String| DatasetError::MalformedScene { scene, reason };
            let img = &record.image;

            if let Some((h, w, c)) = shape {
                if (img.height, img.width, img.channels) != (h, w, c) {
                    return Err(malformed(format!(
                        "image is {}x{}x{} but scene 0 is {h}x{w}x{c}",
                        img.height, img.width, img.channels
                    )));
                }
            }

            if img.pixels.len() != img.height * img.width * img.channels {
                return Err(malformed(format!(
                    "image has {} bytes, expected {}x{}x{}",
                    img.pixels.len(), img.height, img.width, img.channels
                )));
            }
            for (name, group, spec) in [
                ("non-relational", &record.non_relational, self.non_relational),
                ("relational", &record.relational, self.relational),
            ] {
                if group.len() != spec.count || group.answers.len() != spec.count {
                    return Err(malformed(format!(
                        "{name} group has {} questions and {} answers, expected {}",
                        group.len(), group.answers.len(), spec.count
                    )));
                }
            }
        }
        Ok(())
    }
}

// ─── Pure decoding ────────────────────────────────────────────────────────────
/// Which stored record a local index selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSlot {
    NonRelational(usize),
    Relational(usize),
}

/// Map a per-scene index onto exactly one group slot.
/// None when `local_index >= non_relational + relational`.
pub fn route(local_index: usize, non_relational: usize, relational: usize) -> Option<GroupSlot> {
    if local_index < non_relational {
        Some(GroupSlot::NonRelational(local_index))
    } else if local_index < non_relational + relational {
        Some(GroupSlot::Relational(local_index - non_relational))
    } else {
        None
    }
}

/// Position of the single active bit inside `segment`
fn single_active(vector: &[u8], segment: Range<usize>, name: &str) -> DatasetResult<usize> {
    let start  = segment.start.min(vector.len());
    let end    = segment.end.min(vector.len());
    let active: Vec<usize> = (start..end).filter(|&i| vector[i] != 0).collect();

    match active.as_slice() {
        [pos] => Ok(*pos),
        [] => Err(DatasetError::MalformedQuestion(format!(
            "no active bit in the {name} segment {segment:?}"
        ))),
        many => Err(DatasetError::MalformedQuestion(format!(
            "{} active bits in the {name} segment at {many:?}",
            many.len()
        ))),
    }
}

/// Decode a one-hot question vector into `[attribute_id, type_id]`.
pub fn decode_question(vector: &[u8], layout: &OneHotLayout, type_offset: usize) -> DatasetResult<[u32; 2]> {
    let attribute = single_active(vector, layout.attribute_segment(), "attribute")?;
    if layout.kind_len > 0 {
        single_active(vector, layout.kind_segment(), "kind")?;
    }
    let type_pos = single_active(vector, layout.type_start()..vector.len(), "type")?;

    let type_id = type_pos.checked_sub(type_offset).ok_or_else(|| {
        DatasetError::MalformedQuestion(format!(
            "type position {type_pos} is below the group offset {type_offset}"
        ))
    })?;

    Ok([attribute as u32, type_id as u32])
}

// ─── Dataset view ─────────────────────────────────────────────────────────────
/// One decoded Sort-of-CLEVR example
#[derive(Debug, Clone)]
pub struct SortOfClevrItem {
    pub image:    ImageArray,
    /// [attribute_id, type_id]
    pub question: [u32; 2],
    pub answer:   u32,
}

pub struct SortOfClevrDataset {
    split:    Split,
    artifact: SortOfClevrArtifact,
}

impl SortOfClevrDataset {
    /// Validate and wrap an artifact
    pub fn new(split: Split, artifact: SortOfClevrArtifact) -> DatasetResult<Self> {
        artifact.validate()?;
        Ok(Self { split, artifact })
    }

    /// Open `sort-of-clevr-<split>.json` in `dir`. Only train and val exist.
    pub fn open(dir: &Path, split: Split) -> DatasetResult<Self> {
        if split == Split::Sample {
            return Err(DatasetError::UnsupportedSplit {
                split:   split.as_str(),
                dataset: "sort-of-clevr",
            });
        }
        let path: PathBuf = dir.join(SortOfClevrArtifact::file_name(split));
        let artifact      = SortOfClevrArtifact::load(&path)?;
        tracing::info!(
            "Opened Sort-of-CLEVR split '{}' with {} scenes",
            split,
            artifact.scenes.len()
        );
        Self::new(split, artifact)
    }

    pub fn split(&self) -> Split {
        self.split
    }

    pub fn scene_count(&self) -> usize {
        self.artifact.scenes.len()
    }

    /// G1 + G2
    pub fn questions_per_scene(&self) -> usize {
        self.artifact.non_relational.count + self.artifact.relational.count
    }

    pub fn len(&self) -> usize {
        self.scene_count() * self.questions_per_scene()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode question `local_index` of scene `scene_index`
    pub fn decode(&self, scene_index: usize, local_index: usize) -> DatasetResult<SortOfClevrItem> {
        let per_scene = self.questions_per_scene();
        let scene = self.artifact.scenes.get(scene_index).ok_or(DatasetError::IndexOutOfRange {
            index: scene_index,
            len:   self.scene_count(),
        })?;

        let slot = route(local_index, self.artifact.non_relational.count, self.artifact.relational.count)
            .ok_or(DatasetError::IndexOutOfRange { index: local_index, len: per_scene })?;

        let (group, spec, i) = match slot {
            GroupSlot::NonRelational(i) => (&scene.non_relational, self.artifact.non_relational, i),
            GroupSlot::Relational(i)    => (&scene.relational, self.artifact.relational, i),
        };

        let question = decode_question(&group.questions[i], &self.artifact.layout, spec.type_offset)?;

        let img   = &scene.image;
        let image = ImageArray::from_hwc_u8(img.height, img.width, img.channels, &img.pixels)
            .ok_or_else(|| DatasetError::MalformedScene {
                scene:  scene_index,
                reason: "image buffer does not match its shape".to_string(),
            })?;

        Ok(SortOfClevrItem { image, question, answer: group.answers[i] })
    }

    /// Flat access: index → (index / (G1+G2), index % (G1+G2))
    pub fn item(&self, index: usize) -> DatasetResult<SortOfClevrItem> {
        if index >= self.len() {
            return Err(DatasetError::IndexOutOfRange { index, len: self.len() });
        }
        let per_scene = self.questions_per_scene();
        self.decode(index / per_scene, index % per_scene)
    }

    pub fn idx_to_color(&self) -> &[String] {
        &self.artifact.colors
    }

    pub fn idx_to_question(&self) -> &[String] {
        &self.artifact.question_types
    }

    pub fn idx_to_answer(&self) -> &[String] {
        &self.artifact.answers
    }

    pub fn c_size(&self) -> usize {
        self.artifact.colors.len()
    }

    pub fn q_size(&self) -> usize {
        self.artifact.question_types.len()
    }

    pub fn a_size(&self) -> usize {
        self.artifact.answers.len()
    }
}

// None only past the end; a scene that fails to decode yields Some(None)
impl Dataset<Option<SortOfClevrItem>> for SortOfClevrDataset {
    fn get(&self, index: usize) -> Option<Option<SortOfClevrItem>> {
        if index >= SortOfClevrDataset::len(self) {
            return None;
        }
        match self.item(index) {
            Ok(item) => Some(Some(item)),
            Err(e) if e.is_per_item() => {
                tracing::warn!("Skipping Sort-of-CLEVR item {} of split '{}': {}", index, self.split, e);
                Some(None)
            }
            Err(e) => {
                tracing::error!("Sort-of-CLEVR item {} of split '{}' failed: {}", index, self.split, e);
                Some(None)
            }
        }
    }

    fn len(&self) -> usize {
        SortOfClevrDataset::len(self)
    }
}
