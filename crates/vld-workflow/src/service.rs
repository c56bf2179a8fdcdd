use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;
use vld_schemas::{
    coerce_field_map, AuditAction, AuditEntry, EmbraerData, PglData, Role, Shipment,
    ShipmentStatus,
};
use vld_store::ShipmentStore;

use crate::error::WorkflowError;
use crate::export::export_projection;
use crate::transitions::{apply_approval, apply_pgl_submission, apply_rejection};

/// Listing filter. All criteria are optional and conjunctive.
#[derive(Clone, Debug, Default)]
pub struct ShipmentFilter {
    /// Two-digit reference month.
    pub month: Option<String>,
    pub status: Option<ShipmentStatus>,
    /// Case-insensitive substring match over id, Master, House and Empresa.
    pub search_term: Option<String>,
}

impl ShipmentFilter {
    pub fn matches(&self, shipment: &Shipment) -> bool {
        if let Some(month) = &self.month {
            if &shipment.reference_month != month {
                return false;
            }
        }
        if let Some(status) = self.status {
            if shipment.status != status {
                return false;
            }
        }
        if let Some(term) = &self.search_term {
            let term = term.to_lowercase();
            if !term.is_empty() && !searchable_text(shipment).contains(&term) {
                return false;
            }
        }
        true
    }
}

fn searchable_text(shipment: &Shipment) -> String {
    let mut text = shipment.id.to_lowercase();
    for name in ["Master", "House", "Empresa"] {
        if let Some(value) = shipment.pgl_data.field(name) {
            text.push('\n');
            text.push_str(&value.render().to_lowercase());
        }
    }
    text
}

/// The core API surface consumed by the presentation layer.
///
/// Every mutating call takes the acting [`Role`] explicitly and runs as a
/// read-modify-write against the store: one fetch, one transition applied
/// to the in-memory copy, one `put`. A failed store operation aborts the
/// call and the mutated copy is discarded — the persisted record is never
/// half-updated.
///
/// Transitions are serialized behind an internal mutex so that concurrent
/// callers cannot interleave reads between another caller's read and write.
pub struct ShipmentDesk<S> {
    store: S,
    write_gate: Mutex<()>,
}

impl<S: ShipmentStore> ShipmentDesk<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_gate: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Submit (or resubmit) the PGL data set. With `id = None` a new
    /// shipment is created; its audit trail starts with a `creation` entry.
    pub async fn submit_pgl(
        &self,
        id: Option<&str>,
        month_ref: &str,
        raw_fields: &BTreeMap<String, String>,
        actor: Role,
    ) -> Result<Shipment, WorkflowError> {
        let _gate = self.write_gate.lock().await;
        let now = Utc::now();

        let mut shipment = match id {
            Some(id) => self.fetch(id).await?,
            None => new_shipment(month_ref.trim(), actor, now),
        };

        apply_pgl_submission(
            &mut shipment,
            month_ref,
            coerce_field_map(raw_fields),
            actor,
            now,
        )?;
        self.persist(&shipment).await?;

        info!(
            shipment_id = %shipment.id,
            month = %shipment.reference_month,
            "pgl data submitted"
        );
        Ok(shipment)
    }

    /// Approve: stamp the Embraer data set, cross-check both data sets and
    /// record the verdict.
    pub async fn approve(
        &self,
        id: &str,
        raw_fields: &BTreeMap<String, String>,
        comment: &str,
        actor: Role,
    ) -> Result<Shipment, WorkflowError> {
        let _gate = self.write_gate.lock().await;
        let now = Utc::now();

        let mut shipment = self.fetch(id).await?;
        apply_approval(
            &mut shipment,
            coerce_field_map(raw_fields),
            comment,
            actor,
            now,
        )?;
        self.persist(&shipment).await?;

        let divergences = shipment
            .reconciliation
            .as_ref()
            .map(|r| r.divergence_count)
            .unwrap_or_default();
        info!(
            shipment_id = %shipment.id,
            status = %shipment.status,
            divergences,
            "shipment approved and cross-checked"
        );
        Ok(shipment)
    }

    /// Reject back into the PGL-editable cycle. The comment is mandatory.
    pub async fn reject(
        &self,
        id: &str,
        comment: &str,
        actor: Role,
    ) -> Result<Shipment, WorkflowError> {
        let _gate = self.write_gate.lock().await;
        let now = Utc::now();

        let mut shipment = self.fetch(id).await?;
        apply_rejection(&mut shipment, comment, actor, now)?;
        self.persist(&shipment).await?;

        info!(shipment_id = %shipment.id, "shipment rejected");
        Ok(shipment)
    }

    pub async fn get_shipment(&self, id: &str) -> Result<Shipment, WorkflowError> {
        self.fetch(id).await
    }

    pub async fn list_shipments(
        &self,
        filter: &ShipmentFilter,
    ) -> Result<Vec<Shipment>, WorkflowError> {
        let all = self.store.get_all().await.map_err(WorkflowError::storage)?;
        Ok(all.into_iter().filter(|s| filter.matches(s)).collect())
    }

    /// Irreversible removal of one shipment.
    pub async fn delete_shipment(&self, id: &str) -> Result<(), WorkflowError> {
        let _gate = self.write_gate.lock().await;
        // Enforce NotFound rather than silently deleting nothing.
        self.fetch(id).await?;
        self.store.delete(id).await.map_err(WorkflowError::storage)?;
        info!(shipment_id = %id, "shipment deleted");
        Ok(())
    }

    /// Irreversible removal of every shipment.
    pub async fn clear_all(&self) -> Result<(), WorkflowError> {
        let _gate = self.write_gate.lock().await;
        self.store.clear().await.map_err(WorkflowError::storage)?;
        info!("all shipments cleared");
        Ok(())
    }

    /// Flattened read-only projection for the export collaborator.
    pub async fn export_rows(
        &self,
        filter: &ShipmentFilter,
    ) -> Result<Vec<BTreeMap<String, Value>>, WorkflowError> {
        let shipments = self.list_shipments(filter).await?;
        Ok(shipments.iter().map(export_projection).collect())
    }

    async fn fetch(&self, id: &str) -> Result<Shipment, WorkflowError> {
        self.store
            .get(id)
            .await
            .map_err(WorkflowError::storage)?
            .ok_or_else(|| WorkflowError::NotFound { id: id.to_string() })
    }

    async fn persist(&self, shipment: &Shipment) -> Result<(), WorkflowError> {
        self.store.put(shipment).await.map_err(WorkflowError::storage)
    }
}

fn new_shipment(month: &str, actor: Role, now: chrono::DateTime<Utc>) -> Shipment {
    Shipment {
        id: format!("EMB-{}", Uuid::new_v4()),
        reference_month: month.to_string(),
        status: ShipmentStatus::New,
        pgl_data: PglData::default(),
        embraer_data: EmbraerData::default(),
        reconciliation: None,
        history: vec![AuditEntry {
            ts_utc: now,
            action: AuditAction::Creation,
            actor,
            comment: format!("shipment created for month {month}"),
        }],
    }
}
