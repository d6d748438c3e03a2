// ============================================================
// Layer 3 — ImageArray Domain Type
// ============================================================
// A decoded image in the layout tensor consumers expect:
//   channel-first  [channels, height, width]
//   f32 values in  [0.0, 1.0]
//
// Both datasets produce images through `from_hwc_u8`:
//   CLEVR          — pixels decoded from a PNG (channel-last RGB8)
//   Sort-of-CLEVR  — pixels stored in the scene artifact (channel-last)
//
// Index arithmetic for the transpose:
//   hwc[(y * width + x) * channels + c]  →  chw[(c * height + y) * width + x]

#[derive(Debug, Clone, PartialEq)]
pub struct ImageArray {
    pub channels: usize,
    pub height: usize,
    pub width: usize,
    /// Row-major CHW buffer, length = channels * height * width
    pub data: Vec<f32>,
}

impl ImageArray {
    /// Convert a channel-last u8 buffer into channel-first unit floats.
    /// Returns None when the buffer length does not match the shape.
    pub fn from_hwc_u8(height: usize, width: usize, channels: usize, pixels: &[u8]) -> Option<Self> {
        if pixels.len() != height * width * channels {
            return None;
        }

        let mut data = vec![0.0f32; pixels.len()];
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    let src = (y * width + x) * channels + c;
                    let dst = (c * height + y) * width + x;
                    data[dst] = pixels[src] as f32 / 255.0;
                }
            }
        }

        Some(Self { channels, height, width, data })
    }

    pub fn shape(&self) -> [usize; 3] {
        [self.channels, self.height, self.width]
    }
}
