use std::collections::BTreeMap;

use vld_schemas::{AuditAction, Role, ShipmentStatus, Verdict};
use vld_store::{MemoryStore, ShipmentStore};
use vld_workflow::ShipmentDesk;

fn pgl_entry() -> BTreeMap<String, String> {
    let mut raw = BTreeMap::new();
    raw.insert("Empresa".to_string(), "PGL Cargo".to_string());
    raw.insert("Master".to_string(), "ABC123".to_string());
    raw.insert("Peso Bruto".to_string(), "100.0".to_string());
    raw.insert("Frete EUR".to_string(), "2500.00".to_string());
    raw
}

fn embraer_entry_with_divergent_weight() -> BTreeMap<String, String> {
    let mut raw = pgl_entry();
    // Case differs (matches), weight off by ~1.98% (diverges).
    raw.insert("Master".to_string(), "abc123".to_string());
    raw.insert("Peso Bruto".to_string(), "102.0".to_string());
    raw
}

#[tokio::test]
async fn scenario_submit_then_approve_with_one_divergent_field() {
    let desk = ShipmentDesk::new(MemoryStore::new());

    let created = desk
        .submit_pgl(None, "03", &pgl_entry(), Role::Pgl)
        .await
        .unwrap();
    assert_eq!(created.status, ShipmentStatus::PendingApproval);
    assert!(created.id.starts_with("EMB-"));
    assert!(created.reconciliation.is_none(), "unvalidated until approval");

    let approved = desk
        .approve(
            &created.id,
            &embraer_entry_with_divergent_weight(),
            "",
            Role::Embraer,
        )
        .await
        .unwrap();

    assert_eq!(approved.status, ShipmentStatus::ValidatedDivergent);
    let result = approved.reconciliation.as_ref().unwrap();
    assert_eq!(result.verdict, Verdict::Divergent);
    assert_eq!(result.divergence_count, 1);

    let peso = result
        .comparisons
        .iter()
        .find(|c| c.field == "Peso Bruto")
        .unwrap();
    assert!(!peso.matches);

    let master = result
        .comparisons
        .iter()
        .find(|c| c.field == "Master")
        .unwrap();
    assert!(master.matches, "case-insensitive text match");

    let actions: Vec<AuditAction> = approved.history.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::Creation,
            AuditAction::PglSubmission,
            AuditAction::Approval,
        ]
    );

    // The persisted record is the returned record.
    let stored = desk.store().get(&approved.id).await.unwrap().unwrap();
    assert_eq!(stored, approved);
}

#[tokio::test]
async fn scenario_matching_data_sets_validate_ok() {
    let desk = ShipmentDesk::new(MemoryStore::new());

    let created = desk
        .submit_pgl(None, "03", &pgl_entry(), Role::Pgl)
        .await
        .unwrap();

    let approved = desk
        .approve(&created.id, &pgl_entry(), "all good", Role::Embraer)
        .await
        .unwrap();

    assert_eq!(approved.status, ShipmentStatus::ValidatedOk);
    assert_eq!(approved.reconciliation.as_ref().unwrap().divergence_count, 0);
    assert!(approved.embraer_data.approved);
    assert_eq!(approved.embraer_data.comments, "all good");
}
