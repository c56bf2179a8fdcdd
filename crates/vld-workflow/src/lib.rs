//! vld-workflow
//!
//! Shipment workflow core: the state machine governing the two-party
//! data-entry and approval cycle, the service API consumed by the
//! presentation layer, the export projection, and the structured error
//! type.
//!
//! Layering:
//! - [`transitions`] — pure guard + mutation functions, one per action
//! - [`ShipmentDesk`] — read-modify-write orchestration over a
//!   [`vld_store::ShipmentStore`], one transition per call
//! - reconciliation itself lives in vld-reconcile and is invoked only by
//!   the approval transition

mod error;
mod export;
mod service;
pub mod transitions;

pub use error::WorkflowError;
pub use export::export_projection;
pub use service::{ShipmentDesk, ShipmentFilter};
