// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each.
//
// Rules for this layer:
//   - No text normalisation or decoding logic (that's Layer 4)
//   - No printing (that's Layer 1)
//   - No direct file formats (that's Layer 4 and 6)
//   - Only workflow coordination and configuration
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Typed run configuration
pub mod config;

// The one-time CLEVR index build
pub mod build_index_use_case;

// Load a split and render one item
pub mod inspect_use_case;
