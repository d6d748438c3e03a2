// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Concerns that touch the filesystem on behalf of the layers above:
//
//   index_store.rs  — Persisted vocabularies and encoded splits
//                     Written once by `build-index`, read by
//                     every dataset view afterwards.
//
//   image_loader.rs — Default ImageSource
//                     Decodes PNG/JPEG files with the `image`
//                     crate into channel-first float arrays.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling)

/// Vocabulary and encoded-example persistence
pub mod index_store;

/// Image decoding and resizing
pub mod image_loader;
