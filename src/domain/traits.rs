// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The two seams where the pipeline talks to the outside world:
//
//   AnnotationSource — where raw question/answer records come from
//                      (ClevrAnnotationLoader reads the CLEVR json files;
//                      tests use an in-memory source)
//   ImageSource      — how an image file becomes an ImageArray
//                      (RgbImageLoader decodes with the `image` crate)
//
// The index build and the dataset views are written against these
// traits, so neither needs a real CLEVR download to be tested.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::path::Path;

use crate::domain::error::DatasetResult;
use crate::domain::example::RawAnnotation;
use crate::domain::image::ImageArray;
use crate::domain::split::Split;

// ─── AnnotationSource ─────────────────────────────────────────────────────────
/// Any component that can produce the raw annotation records of a split.
pub trait AnnotationSource {
    /// Load every record of one split, in file order.
    /// Fails if the split's annotations cannot be read or parsed.
    fn load_split(&self, split: Split) -> DatasetResult<Vec<RawAnnotation>>;
}

// ─── ImageSource ──────────────────────────────────────────────────────────────
/// Decodes an image file that is known to exist.
///
/// Implementations must be Send + Sync: burn's DataLoader workers
/// call into the dataset view from several threads at once.
pub trait ImageSource: Send + Sync {
    fn load(&self, path: &Path) -> DatasetResult<ImageArray>;
}
