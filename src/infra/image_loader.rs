// ============================================================
// Layer 6 — Image Loader
// ============================================================
// Default ImageSource: decodes an image file with the `image`
// crate and converts it into a channel-first ImageArray.
//
// Steps per image:
//   1. image::open         → DynamicImage (PNG for CLEVR)
//   2. optional resize     → (height, width) from DataConfig
//   3. to_rgb8             → drop CLEVR's alpha channel
//   4. ImageArray::from_hwc_u8 → CHW, values / 255
//
// The resize uses a triangle (bilinear) filter. Batching needs
// every image of a batch to have the same shape, so the CLEVR
// data loaders always configure one.
//
// Reference: image crate documentation (imageops::FilterType)

use std::path::Path;

use image::error::{ParameterError, ParameterErrorKind};
use image::imageops::FilterType;
use image::ImageError;

use crate::domain::error::{DatasetError, DatasetResult};
use crate::domain::image::ImageArray;
use crate::domain::traits::ImageSource;

#[derive(Debug, Clone, Default)]
pub struct RgbImageLoader {
    /// Target (height, width); None keeps the file's own size
    resize: Option<(u32, u32)>,
}

impl RgbImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resize(height: u32, width: u32) -> Self {
        Self { resize: Some((height, width)) }
    }
}

impl ImageSource for RgbImageLoader {
    fn load(&self, path: &Path) -> DatasetResult<ImageArray> {
        let decode_err = |source: ImageError| DatasetError::ImageDecode {
            path: path.to_path_buf(),
            source,
        };

        let mut img = image::open(path).map_err(decode_err)?;
        if let Some((height, width)) = self.resize {
            if img.height() != height || img.width() != width {
                img = img.resize_exact(width, height, FilterType::Triangle);
            }
        }

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        ImageArray::from_hwc_u8(height as usize, width as usize, 3, rgb.as_raw()).ok_or_else(|| {
            decode_err(ImageError::Parameter(ParameterError::from_kind(
                ParameterErrorKind::DimensionMismatch,
            )))
        })
    }
}
