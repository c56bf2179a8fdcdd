//! vld-reconcile
//!
//! Field reconciliation engine: cross-checks the PGL and Embraer data sets
//! field-by-field and aggregates a verdict.
//!
//! Architectural decisions:
//! - Numeric fields match within a 1% relative tolerance
//! - Text fields match on trimmed, case-insensitive equality
//! - Any single mismatch makes the whole run divergent
//! - Output order follows the field schema, so repeated runs on the same
//!   snapshot produce identical results
//!
//! Deterministic, pure logic. No IO. No clock — the validation timestamp is
//! supplied by the caller.

mod compare;
mod engine;

pub use compare::{compare_values, ValueComparison, NUMERIC_TOLERANCE, ZERO_MATCH_EPSILON};
pub use engine::{reconcile, reconcile_shipment};
