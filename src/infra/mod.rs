// ============================================================
// Layer 6: Infrastructure Layer
// ============================================================
// Persistence of pipeline results:
//
//   result_store.rs  : key-value store of the chunk table,
//                      the vocabulary and the run config.
//                      `read` loads from here without
//                      recomputing anything.
//
//   split_report.rs  : per-bin split counts as CSV, written
//                      after every preparation run.

/// Saving and loading of prepared datasets
pub mod result_store;

/// Split summary CSV writer
pub mod split_report;
