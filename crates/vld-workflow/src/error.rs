use vld_schemas::{Role, ShipmentStatus};

/// Structured failure surfaced to the presentation layer.
///
/// The four kinds are distinguishable by matching; none is ever swallowed
/// and none leaves a half-updated record behind (transitions mutate an
/// in-memory copy that is only persisted on success).
#[derive(Debug)]
pub enum WorkflowError {
    /// Input failed a validation guard (missing reference month, missing
    /// rejection comment, immutable-month violation).
    Validation(String),
    /// Action attempted from a status that does not permit it, or by the
    /// wrong role. Deterministic — callers are expected to prevent it by
    /// construction, but the core still enforces it.
    IllegalTransition {
        action: &'static str,
        status: ShipmentStatus,
        actor: Role,
    },
    /// Operation on an unknown shipment id.
    NotFound { id: String },
    /// Underlying store operation failed. The only kind worth a caller
    /// retry; the core itself does not retry.
    Storage(anyhow::Error),
}

impl WorkflowError {
    pub(crate) fn storage(err: anyhow::Error) -> Self {
        Self::Storage(err)
    }
}

impl std::fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(reason) => write!(f, "validation failed: {reason}"),
            Self::IllegalTransition {
                action,
                status,
                actor,
            } => write!(
                f,
                "illegal transition: {action} not permitted from status {status} for role {actor}"
            ),
            Self::NotFound { id } => write!(f, "shipment not found: {id}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl std::error::Error for WorkflowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
