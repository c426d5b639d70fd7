// ============================================================
// Layer 2: Application / Use Cases
// ============================================================
// Orchestrates the other layers for one goal each: preparing
// a dataset, or reading back a prepared one.
//
// Rules for this layer:
//   - No labelling, splitting or chunking logic here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination

// The preparation workflow
pub mod prepare_use_case;

// Reading a stored dataset
pub mod read_use_case;
