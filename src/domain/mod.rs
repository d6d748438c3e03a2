// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust types that define what the pipeline works with.
//
// Rules for this layer:
//   - NO burn types
//   - NO file I/O
//   - Only structs, enums, traits and the error taxonomy
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Error taxonomy shared by every layer below the application
pub mod error;

// Raw, normalised and encoded question/answer examples
pub mod example;

// Channel-first float images handed to consumers
pub mod image;

// Named dataset partitions (train / val / sample)
pub mod split;

// Core abstractions (traits) that other layers implement
pub mod traits;

// Frozen token <-> id mappings
pub mod vocabulary;
