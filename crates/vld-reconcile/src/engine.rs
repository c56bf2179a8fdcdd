use chrono::{DateTime, Utc};
use vld_schemas::{
    FieldComparison, FieldMap, ReconciliationResult, Shipment, Verdict, COMPARISON_FIELDS,
};

use crate::compare::compare_values;

/// Cross-check the two data sets over the full field schema.
///
/// Every schema field is compared exactly once, in schema order, so the
/// output is deterministic: reconciling the same snapshot twice (with the
/// same `validated_at_utc`) yields identical results. The verdict is
/// `Divergent` as soon as any single field pair fails to match.
///
/// This is the sole place the divergence count and verdict are computed.
pub fn reconcile(
    pgl: &FieldMap,
    embraer: &FieldMap,
    validated_at_utc: DateTime<Utc>,
) -> ReconciliationResult {
    let mut comparisons = Vec::with_capacity(COMPARISON_FIELDS.len());
    let mut divergence_count = 0usize;

    for spec in COMPARISON_FIELDS {
        let pgl_value = pgl.get(spec.name).and_then(Option::as_ref);
        let embraer_value = embraer.get(spec.name).and_then(Option::as_ref);
        let outcome = compare_values(pgl_value, embraer_value, spec.numeric);

        if !outcome.matches {
            divergence_count += 1;
        }

        comparisons.push(FieldComparison {
            field: spec.name.to_string(),
            pgl_value: pgl_value.cloned(),
            embraer_value: embraer_value.cloned(),
            matches: outcome.matches,
            percent_difference: outcome.percent_difference,
            is_numeric: spec.numeric,
        });
    }

    let verdict = if divergence_count == 0 {
        Verdict::Ok
    } else {
        Verdict::Divergent
    };

    ReconciliationResult {
        verdict,
        divergence_count,
        comparisons,
        validated_at_utc,
    }
}

/// Convenience entry point over a whole shipment.
pub fn reconcile_shipment(
    shipment: &Shipment,
    validated_at_utc: DateTime<Utc>,
) -> ReconciliationResult {
    reconcile(
        &shipment.pgl_data.fields,
        &shipment.embraer_data.fields,
        validated_at_utc,
    )
}
