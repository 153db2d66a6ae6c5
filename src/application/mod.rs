// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer wires Layers 4 and 6 together into workflows.
//
// Rules for this layer:
//   - No filtering or splitting logic here (that's Layer 4)
//   - No printing or prompting here (that's Layer 1)
//   - No file formats here (that's Layer 4 / Layer 6)
//   - Only workflow coordination

// The working dataset and the operations both front ends share
pub mod session;

// Flag-driven single pass: load → steps → split → save
pub mod restrict_use_case;

// Dataset analysis and restriction profiles
pub mod profile_use_case;
