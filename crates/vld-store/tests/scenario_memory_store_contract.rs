use chrono::Utc;
use vld_schemas::{
    AuditAction, AuditEntry, EmbraerData, PglData, Role, Shipment, ShipmentStatus,
};
use vld_store::{MemoryStore, ShipmentStore};

fn sample_shipment(id: &str) -> Shipment {
    Shipment {
        id: id.to_string(),
        reference_month: "07".to_string(),
        status: ShipmentStatus::PendingApproval,
        pgl_data: PglData::default(),
        embraer_data: EmbraerData::default(),
        reconciliation: None,
        history: vec![AuditEntry {
            ts_utc: Utc::now(),
            action: AuditAction::Creation,
            actor: Role::Pgl,
            comment: "shipment created for month 07".to_string(),
        }],
    }
}

#[tokio::test]
async fn scenario_memory_store_honors_the_store_contract() {
    let store = MemoryStore::new();
    assert!(store.is_empty());

    store.put(&sample_shipment("EMB-a")).await.unwrap();
    store.put(&sample_shipment("EMB-b")).await.unwrap();
    assert_eq!(store.len(), 2);

    // Upsert replaces, never duplicates.
    let mut updated = sample_shipment("EMB-a");
    updated.status = ShipmentStatus::Rejected;
    store.put(&updated).await.unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(
        store.get("EMB-a").await.unwrap().unwrap().status,
        ShipmentStatus::Rejected
    );

    store.delete("EMB-b").await.unwrap();
    assert!(store.get("EMB-b").await.unwrap().is_none());

    store.clear().await.unwrap();
    assert!(store.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn scenario_store_trait_is_usable_behind_a_trait_object() {
    // Callers may hold the backend as `dyn ShipmentStore` when the concrete
    // type is decided at runtime.
    let store: Box<dyn ShipmentStore> = Box::new(MemoryStore::new());

    store.put(&sample_shipment("EMB-dyn")).await.unwrap();
    let fetched = store.get("EMB-dyn").await.unwrap().unwrap();
    assert_eq!(fetched.id, "EMB-dyn");
    assert_eq!(store.get_all().await.unwrap().len(), 1);
}
