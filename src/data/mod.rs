// ============================================================
// Layer 4: Data Pipeline
// ============================================================
// Everything from raw TSV files to the chunk table.
//
// The pipeline flows in this order:
//
//   contig files + annotation table
//       │
//       ▼
//   loader         → reads TSV files into RawContig / Annotation
//       │
//       ▼
//   assembler      → per-position binary labels
//       │
//       ▼
//   splitter       → length bin + training/validation/test
//       │
//       ▼
//   vocabulary     → token → id table, token_ids per contig
//       │
//       ▼
//   chunker        → padded fixed-length windows
//       │
//       ▼
//   ChunkedDataset → chunk table + vocabulary
//       │
//       ▼
//   ChunkBatcher   → [n_chunks, chunk_len] arrays
//
// The stages run strictly in sequence; the splitter and the
// vocabulary builder are order sensitive.

/// Reads the annotation table and contig files
pub mod loader;

/// Merges tokens with annotation intervals into labels
pub mod assembler;

/// Length-stratified training/validation/test split
pub mod splitter;

/// Token → id table
pub mod vocabulary;

/// Sliding window chunking with padding
pub mod chunker;

/// Chunk table plus vocabulary
pub mod dataset;

/// Stacks chunks into flat batch arrays
pub mod batcher;
