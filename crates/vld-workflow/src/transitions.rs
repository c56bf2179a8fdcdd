//! Shipment state machine.
//!
//! # Design
//!
//! Pure transition functions over a `&mut Shipment` — no IO, no clock, no
//! randomness. The service layer fetches the record, applies exactly one
//! transition here, and persists the updated copy; a guard failure leaves
//! the record untouched because the error is returned before any mutation.
//!
//! Invariants enforced:
//!
//! 1. **Legal transitions only.** Wrong status or wrong role returns
//!    [`WorkflowError::IllegalTransition`] — never a silent no-op.
//! 2. **History is append-only.** Every successful transition appends
//!    exactly one audit entry; earlier entries are never rewritten.
//! 3. **Reference month freezes after creation.** Only a shipment still in
//!    `new` may change its month.
//!
//! # State diagram
//!
//! ```text
//!   new ──────────────┐
//!                     │ submit PGL data (role: pgl)
//!   pending_pgl ──────┼──────────► pending_approval
//!        ▲            │                 │         │
//!        │ (editable  │        approve  │         │ reject (role: embraer,
//!        │  cycle)    │  (role:embraer) │         │         comment required)
//!   rejected ◄────────┴─────────────────┼─────────┘
//!        │ submit PGL data              ▼
//!        └────────────────► validated_ok | validated_divergent (terminal)
//! ```

use chrono::{DateTime, Utc};
use vld_reconcile::reconcile;
use vld_schemas::{
    AuditAction, AuditEntry, FieldMap, Role, Shipment, ShipmentStatus, Verdict,
};

use crate::error::WorkflowError;

/// Submit (or resubmit) the PGL data set.
///
/// Legal from `new`, `pending_pgl` and `rejected`; the actor must be the
/// PGL role. Stamps submission metadata and advances to
/// `pending_approval`.
pub fn apply_pgl_submission(
    shipment: &mut Shipment,
    month_ref: &str,
    fields: FieldMap,
    actor: Role,
    now: DateTime<Utc>,
) -> Result<(), WorkflowError> {
    const ACTION: &str = "submit PGL data";

    if actor != Role::Pgl || !shipment.status.is_pgl_editable() {
        return Err(WorkflowError::IllegalTransition {
            action: ACTION,
            status: shipment.status,
            actor,
        });
    }

    let month = month_ref.trim();
    validate_month(month)?;
    if shipment.status != ShipmentStatus::New && month != shipment.reference_month {
        return Err(WorkflowError::Validation(format!(
            "reference month is immutable after creation (is {}, got {month})",
            shipment.reference_month
        )));
    }

    let resubmission = shipment.status == ShipmentStatus::Rejected;

    shipment.reference_month = month.to_string();
    shipment.pgl_data.fields = fields;
    shipment.pgl_data.submitted_at_utc = Some(now);
    shipment.pgl_data.submitted_by = Some(actor);
    shipment.status = ShipmentStatus::PendingApproval;
    shipment.history.push(AuditEntry {
        ts_utc: now,
        action: AuditAction::PglSubmission,
        actor,
        comment: if resubmission {
            "PGL data corrected".to_string()
        } else {
            "PGL data submitted".to_string()
        },
    });

    Ok(())
}

/// Approve the shipment: stamp the Embraer data set and run the
/// reconciliation engine.
///
/// Legal only from `pending_approval` with the Embraer role. The resulting
/// status is `validated_ok` or `validated_divergent` per the verdict; the
/// audit entry records the divergence count.
pub fn apply_approval(
    shipment: &mut Shipment,
    fields: FieldMap,
    comment: &str,
    actor: Role,
    now: DateTime<Utc>,
) -> Result<(), WorkflowError> {
    const ACTION: &str = "approve";

    if actor != Role::Embraer || shipment.status != ShipmentStatus::PendingApproval {
        return Err(WorkflowError::IllegalTransition {
            action: ACTION,
            status: shipment.status,
            actor,
        });
    }

    shipment.embraer_data.fields = fields;
    shipment.embraer_data.submitted_at_utc = Some(now);
    shipment.embraer_data.submitted_by = Some(actor);
    shipment.embraer_data.approved = true;
    shipment.embraer_data.comments = comment.trim().to_string();
    shipment.embraer_data.reviewed_at_utc = Some(now);

    let result = reconcile(&shipment.pgl_data.fields, &shipment.embraer_data.fields, now);
    let divergences = result.divergence_count;

    shipment.status = match result.verdict {
        Verdict::Ok => ShipmentStatus::ValidatedOk,
        Verdict::Divergent => ShipmentStatus::ValidatedDivergent,
    };
    shipment.reconciliation = Some(result);
    shipment.history.push(AuditEntry {
        ts_utc: now,
        action: AuditAction::Approval,
        actor,
        comment: format!("approved; {divergences} divergence(s) found"),
    });

    Ok(())
}

/// Reject the shipment back into the PGL-editable cycle.
///
/// Legal only from `pending_approval` with the Embraer role, and the
/// rejection comment must be non-empty — the submitting party needs to know
/// what to correct.
pub fn apply_rejection(
    shipment: &mut Shipment,
    comment: &str,
    actor: Role,
    now: DateTime<Utc>,
) -> Result<(), WorkflowError> {
    const ACTION: &str = "reject";

    if actor != Role::Embraer || shipment.status != ShipmentStatus::PendingApproval {
        return Err(WorkflowError::IllegalTransition {
            action: ACTION,
            status: shipment.status,
            actor,
        });
    }

    let comment = comment.trim();
    if comment.is_empty() {
        return Err(WorkflowError::Validation(
            "rejection requires a comment".to_string(),
        ));
    }

    shipment.embraer_data.approved = false;
    shipment.embraer_data.comments = comment.to_string();
    shipment.embraer_data.reviewed_at_utc = Some(now);
    shipment.status = ShipmentStatus::Rejected;
    shipment.history.push(AuditEntry {
        ts_utc: now,
        action: AuditAction::Rejection,
        actor,
        comment: comment.to_string(),
    });

    Ok(())
}

fn validate_month(month: &str) -> Result<(), WorkflowError> {
    if month.is_empty() {
        return Err(WorkflowError::Validation(
            "reference month is required".to_string(),
        ));
    }
    let valid = month.len() == 2
        && month.bytes().all(|b| b.is_ascii_digit())
        && matches!(month.parse::<u8>(), Ok(1..=12));
    if !valid {
        return Err(WorkflowError::Validation(format!(
            "reference month must be a two-digit month 01..12, got {month:?}"
        )));
    }
    Ok(())
}
