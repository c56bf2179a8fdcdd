//! vld-schemas
//!
//! Shared data model for the shipment validation core: the `Shipment`
//! aggregate, party submissions, the embedded audit trail, reconciliation
//! result types, and the static field schema.
//!
//! Plain serde types only. No IO, no clock, no business rules — transition
//! logic lives in vld-workflow, comparison logic in vld-reconcile.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod fields;

pub use fields::{field_spec, is_numeric_field, FieldSpec, COMPARISON_FIELDS};

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// The two parties of the workflow. Every core call takes the acting role as
/// an explicit parameter; there is no ambient "current user".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Submitting party — enters the originating data set.
    Pgl,
    /// Reviewing party — enters the independent second data set and renders
    /// the approve/reject verdict.
    Embraer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Pgl => "pgl",
            Role::Embraer => "embraer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Shipment lifecycle status. Mutated only through the transition functions
/// in vld-workflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    /// Freshly constructed, not yet persisted. The only status in which the
    /// reference month may still change.
    New,
    /// Waiting for the PGL data set.
    PendingPgl,
    /// PGL data submitted; waiting for the Embraer review.
    PendingApproval,
    /// Review rejected the PGL data; back in the PGL-editable cycle.
    Rejected,
    /// Approved and cross-checked with zero divergences. Terminal.
    ValidatedOk,
    /// Approved and cross-checked with at least one divergence. Terminal.
    ValidatedDivergent,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::PendingPgl => "pending_pgl",
            Self::PendingApproval => "pending_approval",
            Self::Rejected => "rejected",
            Self::ValidatedOk => "validated_ok",
            Self::ValidatedDivergent => "validated_divergent",
        }
    }

    /// Terminal statuses are read-only with respect to both field maps.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ValidatedOk | Self::ValidatedDivergent)
    }

    /// Statuses from which the PGL party may (re)submit its data set.
    pub fn is_pgl_editable(&self) -> bool {
        matches!(self, Self::New | Self::PendingPgl | Self::Rejected)
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Field values
// ---------------------------------------------------------------------------

/// A single field value as entered by one party. Absent values are carried
/// as `None` at the map level, so this enum only covers present values.
/// Untagged: numbers persist as JSON numbers, text as JSON strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Render the value as trimmed text, the normalized form the comparison
    /// engine operates on.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.trim().to_string(),
        }
    }
}

/// Field name → value mapping for one party's data set.
pub type FieldMap = BTreeMap<String, Option<FieldValue>>;

/// Normalize an optional field value to comparable text: absent becomes the
/// empty string, everything else is trimmed.
pub fn normalized_text(value: Option<&FieldValue>) -> String {
    value.map(FieldValue::render).unwrap_or_default()
}

/// Coerce raw presentation-layer input into a typed field value.
///
/// Numeric fields parse to `Number`; blank or unparsable numeric input is
/// treated as absent rather than an error. `f64::from_str` also accepts
/// "NaN" and "inf", which are not valid data entry and do not survive a
/// JSON round-trip, so non-finite parses count as unparsable too. Text
/// fields keep the trimmed string, including the empty string (a blank
/// text entry is still an entry, and two blanks compare equal).
pub fn coerce_field_value(name: &str, raw: &str) -> Option<FieldValue> {
    let trimmed = raw.trim();
    if is_numeric_field(name) {
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(FieldValue::Number)
    } else {
        Some(FieldValue::Text(trimmed.to_string()))
    }
}

/// Build a full-schema field map from raw input. Fields the caller did not
/// supply are treated as blank.
pub fn coerce_field_map(raw: &BTreeMap<String, String>) -> FieldMap {
    COMPARISON_FIELDS
        .iter()
        .map(|spec| {
            let raw_value = raw.get(spec.name).map(String::as_str).unwrap_or("");
            (spec.name.to_string(), coerce_field_value(spec.name, raw_value))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Party submissions
// ---------------------------------------------------------------------------

/// The submitting party's data set plus submission metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PglData {
    pub fields: FieldMap,
    pub submitted_at_utc: Option<DateTime<Utc>>,
    pub submitted_by: Option<Role>,
}

impl PglData {
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).and_then(Option::as_ref)
    }
}

/// The reviewing party's independent data set plus review metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbraerData {
    pub fields: FieldMap,
    pub approved: bool,
    pub comments: String,
    pub reviewed_at_utc: Option<DateTime<Utc>>,
    pub submitted_at_utc: Option<DateTime<Utc>>,
    pub submitted_by: Option<Role>,
}

impl EmbraerData {
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).and_then(Option::as_ref)
    }
}

// ---------------------------------------------------------------------------
// Audit trail
// ---------------------------------------------------------------------------

/// Audit actions, one per transition kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Creation,
    PglSubmission,
    Approval,
    Rejection,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creation => "creation",
            Self::PglSubmission => "pgl_submission",
            Self::Approval => "approval",
            Self::Rejection => "rejection",
        }
    }
}

/// One immutable audit entry. Appended by transitions, never rewritten.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub ts_utc: DateTime<Utc>,
    pub action: AuditAction,
    pub actor: Role,
    pub comment: String,
}

// ---------------------------------------------------------------------------
// Reconciliation results
// ---------------------------------------------------------------------------

/// Aggregate reconciliation verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Ok,
    Divergent,
}

/// Outcome of comparing one field pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldComparison {
    pub field: String,
    pub pgl_value: Option<FieldValue>,
    pub embraer_value: Option<FieldValue>,
    pub matches: bool,
    /// Relative difference in percent for numeric pairs where both values
    /// parsed; `None` for text fields and unparsable numeric input.
    pub percent_difference: Option<f64>,
    pub is_numeric: bool,
}

/// Result of one reconciliation run over the full field schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub verdict: Verdict,
    pub divergence_count: usize,
    pub comparisons: Vec<FieldComparison>,
    pub validated_at_utc: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Shipment aggregate
// ---------------------------------------------------------------------------

/// The aggregate root. Persisted as one self-describing JSON document keyed
/// by `id`; mutated exclusively through vld-workflow transitions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: String,
    pub reference_month: String,
    pub status: ShipmentStatus,
    pub pgl_data: PglData,
    pub embraer_data: EmbraerData,
    /// `None` until the approval transition has run the reconciliation
    /// engine — the "unvalidated" sentinel.
    pub reconciliation: Option<ReconciliationResult>,
    /// Append-only. Never empty after creation, never truncated.
    pub history: Vec<AuditEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_numeric_field_parses_or_drops() {
        assert_eq!(
            coerce_field_value("Peso Bruto", " 100.5 "),
            Some(FieldValue::Number(100.5))
        );
        assert_eq!(coerce_field_value("Peso Bruto", ""), None);
        assert_eq!(coerce_field_value("Peso Bruto", "abc"), None);
        // f64::from_str accepts these; the coercion does not.
        assert_eq!(coerce_field_value("Peso Bruto", "NaN"), None);
        assert_eq!(coerce_field_value("Peso Bruto", "inf"), None);
        assert_eq!(coerce_field_value("Peso Bruto", "-infinity"), None);
    }

    #[test]
    fn coerce_text_field_keeps_trimmed_string() {
        assert_eq!(
            coerce_field_value("Master", "  ABC123 "),
            Some(FieldValue::Text("ABC123".to_string()))
        );
        assert_eq!(
            coerce_field_value("Master", ""),
            Some(FieldValue::Text(String::new()))
        );
    }

    #[test]
    fn coerce_field_map_covers_whole_schema() {
        let mut raw = BTreeMap::new();
        raw.insert("Peso Bruto".to_string(), "100".to_string());
        let map = coerce_field_map(&raw);
        assert_eq!(map.len(), COMPARISON_FIELDS.len());
        assert_eq!(
            map.get("Peso Bruto").unwrap(),
            &Some(FieldValue::Number(100.0))
        );
        // Unsupplied numeric field is absent, unsupplied text field is blank.
        assert_eq!(map.get("Frete EUR").unwrap(), &None);
        assert_eq!(
            map.get("Master").unwrap(),
            &Some(FieldValue::Text(String::new()))
        );
    }

    #[test]
    fn status_round_trips_through_serde() {
        let s = serde_json::to_string(&ShipmentStatus::ValidatedDivergent).unwrap();
        assert_eq!(s, "\"validated_divergent\"");
        let back: ShipmentStatus = serde_json::from_str(&s).unwrap();
        assert_eq!(back, ShipmentStatus::ValidatedDivergent);
    }

    #[test]
    fn field_value_serializes_untagged() {
        let n = serde_json::to_string(&FieldValue::Number(1.5)).unwrap();
        assert_eq!(n, "1.5");
        let t = serde_json::to_string(&FieldValue::Text("x".to_string())).unwrap();
        assert_eq!(t, "\"x\"");
    }
}
