// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust types that describe a transaction dataset and the
// ways an operation over it can go wrong.
//
// Rules for this layer:
//   - NO file formats (CSV lives in Layer 4 and Layer 6)
//   - NO printing or prompting (that's Layer 1)
//   - Only plain Rust structs, enums, and traits
//
// The hierarchy every operation has to respect:
//
//   User ──< Basket ──< Record
//
// A record is one row of the table. A basket is every record
// sharing one (user, basket) pair. A user is every basket
// sharing one user id. None of these are stored separately;
// they are derived from the rows on demand.

/// The in-memory transaction table
pub mod dataset;

/// Configurable names of the user / basket / product columns
pub mod columns;

/// Total ordering for basket identifiers
pub mod order_key;

/// Fatal errors and non-fatal diagnostics
pub mod error;

/// Source and sink abstractions implemented by Layers 4 and 6
pub mod traits;
