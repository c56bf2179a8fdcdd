use std::collections::BTreeMap;

use serde_json::Value;
use vld_schemas::{FieldValue, Shipment, COMPARISON_FIELDS};

/// Flatten one shipment into the read-only mapping consumed by the export
/// collaborator: one key per PGL field, one `"{field} (Embraer)"` key per
/// Embraer field, plus status and validation metadata. The core produces
/// the mapping only; spreadsheet formatting belongs to the collaborator.
pub fn export_projection(shipment: &Shipment) -> BTreeMap<String, Value> {
    let mut row = BTreeMap::new();

    for spec in COMPARISON_FIELDS {
        row.insert(
            spec.name.to_string(),
            value_to_json(shipment.pgl_data.field(spec.name)),
        );
        row.insert(
            format!("{} (Embraer)", spec.name),
            value_to_json(shipment.embraer_data.field(spec.name)),
        );
    }

    row.insert("ID".to_string(), Value::String(shipment.id.clone()));
    row.insert(
        "Reference Month".to_string(),
        Value::String(shipment.reference_month.clone()),
    );
    row.insert(
        "Status".to_string(),
        Value::String(shipment.status.as_str().to_string()),
    );
    row.insert(
        "Approved".to_string(),
        Value::Bool(shipment.embraer_data.approved),
    );
    row.insert(
        "Comments".to_string(),
        Value::String(shipment.embraer_data.comments.clone()),
    );
    row.insert(
        "Reviewed At".to_string(),
        shipment
            .embraer_data
            .reviewed_at_utc
            .map(|t| Value::String(t.to_rfc3339()))
            .unwrap_or(Value::Null),
    );

    match &shipment.reconciliation {
        Some(result) => {
            row.insert(
                "Total Divergences".to_string(),
                Value::from(result.divergence_count),
            );
            row.insert(
                "Validated At".to_string(),
                Value::String(result.validated_at_utc.to_rfc3339()),
            );
        }
        None => {
            row.insert("Total Divergences".to_string(), Value::Null);
            row.insert("Validated At".to_string(), Value::Null);
        }
    }

    row
}

fn value_to_json(value: Option<&FieldValue>) -> Value {
    match value {
        None => Value::Null,
        Some(FieldValue::Number(n)) => Value::from(*n),
        Some(FieldValue::Text(s)) => Value::String(s.clone()),
    }
}
