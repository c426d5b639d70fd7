// ============================================================
// Layer 3: Domain Layer
// ============================================================
// Plain structs, enums and traits describing contigs, chunks
// and the errors the pipeline can raise.
//
// Rules for this layer:
//   - NO file I/O
//   - NO random number generation
//   - Only plain Rust structs, enums, and traits

// Per-contig records and annotation intervals
pub mod contig;

// Fixed-length windows sliced from a contig
pub mod chunk;

// Typed pipeline errors
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
