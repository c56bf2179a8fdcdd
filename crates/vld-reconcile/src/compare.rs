use vld_schemas::{normalized_text, FieldValue};

/// Relative tolerance for numeric fields: values match when their absolute
/// difference is at most 1% of the average of their magnitudes.
pub const NUMERIC_TOLERANCE: f64 = 0.01;

/// When exactly one of the two numeric values is zero, a relative tolerance
/// is meaningless. The pair still matches if the nonzero value is below this
/// absolute threshold; otherwise it is reported as maximally divergent.
pub const ZERO_MATCH_EPSILON: f64 = 0.0001;

/// Outcome of comparing one pair of values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueComparison {
    pub matches: bool,
    /// Relative difference in percent. `None` when the comparison was
    /// textual or when at least one numeric value did not parse.
    pub percent_difference: Option<f64>,
}

impl ValueComparison {
    fn text(matches: bool) -> Self {
        Self {
            matches,
            percent_difference: None,
        }
    }
}

/// Compare one PGL value against one Embraer value.
///
/// Both inputs are normalized first: absent values become the empty string
/// and text is trimmed. Text fields compare case-insensitively. Numeric
/// fields parse both sides and apply the tolerance rules:
///
/// - neither side parses → both effectively absent, treated as agreeing
/// - exactly one side parses → mismatch (one party entered a number the
///   other did not)
/// - both zero → match, 0% difference
/// - exactly one zero → match only when the nonzero value is negligible;
///   reported as a fixed 100% divergence
/// - both nonzero → `diff ≤ avg(|a|,|b|) · NUMERIC_TOLERANCE`
pub fn compare_values(
    pgl: Option<&FieldValue>,
    embraer: Option<&FieldValue>,
    is_numeric: bool,
) -> ValueComparison {
    let v1 = normalized_text(pgl);
    let v2 = normalized_text(embraer);

    if !is_numeric {
        return ValueComparison::text(v1.to_lowercase() == v2.to_lowercase());
    }

    // `f64::from_str` accepts "NaN"/"inf"; those count as unparsable here,
    // otherwise a NaN pair would report `percent_difference = Some(NaN)`.
    let n1 = v1.parse::<f64>().ok().filter(|n| n.is_finite());
    let n2 = v2.parse::<f64>().ok().filter(|n| n.is_finite());

    match (n1, n2) {
        (None, None) => ValueComparison::text(true),
        (Some(_), None) | (None, Some(_)) => ValueComparison::text(false),
        (Some(a), Some(b)) => compare_numbers(a, b),
    }
}

fn compare_numbers(a: f64, b: f64) -> ValueComparison {
    if a == 0.0 && b == 0.0 {
        return ValueComparison {
            matches: true,
            percent_difference: Some(0.0),
        };
    }

    let diff = (a - b).abs();

    if a == 0.0 || b == 0.0 {
        return ValueComparison {
            matches: diff < ZERO_MATCH_EPSILON,
            percent_difference: Some(100.0),
        };
    }

    let avg = (a.abs() + b.abs()) / 2.0;
    ValueComparison {
        matches: diff <= avg * NUMERIC_TOLERANCE,
        percent_difference: Some(100.0 * diff / avg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Option<FieldValue> {
        Some(FieldValue::Number(n))
    }

    fn text(s: &str) -> Option<FieldValue> {
        Some(FieldValue::Text(s.to_string()))
    }

    #[test]
    fn text_comparison_is_case_insensitive_and_symmetric() {
        let a = text("ABC123");
        let b = text("abc123");
        let ab = compare_values(a.as_ref(), b.as_ref(), false);
        let ba = compare_values(b.as_ref(), a.as_ref(), false);
        assert!(ab.matches);
        assert_eq!(ab, ba);
        assert_eq!(ab.percent_difference, None);
    }

    #[test]
    fn absent_text_equals_empty_text() {
        let c = compare_values(None, text("").as_ref(), false);
        assert!(c.matches);
    }

    #[test]
    fn numeric_self_comparison_matches() {
        for x in [0.0001, 1.0, 100.9, 1_000_000.25, -42.5] {
            let v = num(x);
            assert!(compare_values(v.as_ref(), v.as_ref(), true).matches, "x={x}");
        }
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        // avg = 200, diff = 2 = avg * 0.01 exactly: still a match.
        let at = compare_values(num(199.0).as_ref(), num(201.0).as_ref(), true);
        assert!(at.matches);
        let pct = at.percent_difference.unwrap();
        assert!((pct - 1.0).abs() < 1e-9, "pct={pct}");

        // One tick beyond the boundary: mismatch.
        let over = compare_values(num(199.0).as_ref(), num(201.1).as_ref(), true);
        assert!(!over.matches);
    }

    #[test]
    fn peso_bruto_examples() {
        // 100.0 vs 100.9 → ~0.90%, inside 1%.
        let close = compare_values(num(100.0).as_ref(), num(100.9).as_ref(), true);
        assert!(close.matches);
        let pct = close.percent_difference.unwrap();
        assert!(pct > 0.89 && pct < 0.91, "pct={pct}");

        // 100.0 vs 102.0 → ~1.98%, outside 1%.
        let far = compare_values(num(100.0).as_ref(), num(102.0).as_ref(), true);
        assert!(!far.matches);
        let pct = far.percent_difference.unwrap();
        assert!(pct > 1.97 && pct < 1.99, "pct={pct}");
    }

    #[test]
    fn both_unparsable_numeric_values_agree() {
        let c = compare_values(None, None, true);
        assert!(c.matches);
        assert_eq!(c.percent_difference, None);

        let c = compare_values(text("n/a").as_ref(), text("tbd").as_ref(), true);
        assert!(c.matches);
    }

    #[test]
    fn non_finite_numeric_text_counts_as_unparsable() {
        // "NaN"/"inf" parse under f64::from_str but are not valid entries:
        // a pair of them agrees like any other unparsable pair.
        let c = compare_values(text("NaN").as_ref(), text("NaN").as_ref(), true);
        assert!(c.matches);
        assert_eq!(c.percent_difference, None);

        // One real number against "inf" is a mismatch with no percentage,
        // never Some(inf) or Some(NaN).
        let c = compare_values(num(10.0).as_ref(), text("inf").as_ref(), true);
        assert!(!c.matches);
        assert_eq!(c.percent_difference, None);
    }

    #[test]
    fn one_unparsable_numeric_value_diverges() {
        let c = compare_values(num(10.0).as_ref(), None, true);
        assert!(!c.matches);
        assert_eq!(c.percent_difference, None);
    }

    #[test]
    fn zero_handling() {
        let both = compare_values(num(0.0).as_ref(), num(0.0).as_ref(), true);
        assert!(both.matches);
        assert_eq!(both.percent_difference, Some(0.0));

        // One zero, the other material: fixed 100% divergence.
        let one = compare_values(num(0.0).as_ref(), num(5.0).as_ref(), true);
        assert!(!one.matches);
        assert_eq!(one.percent_difference, Some(100.0));

        // One zero, the other negligible: tolerated.
        let tiny = compare_values(num(0.0).as_ref(), num(0.00005).as_ref(), true);
        assert!(tiny.matches);
    }

    #[test]
    fn numeric_text_input_parses_before_comparison() {
        // Values arriving as text still compare numerically on numeric fields.
        let c = compare_values(text("100").as_ref(), num(100.5).as_ref(), true);
        assert!(c.matches);
    }
}
