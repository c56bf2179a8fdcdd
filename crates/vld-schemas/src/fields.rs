//! Static field schema for the freight validation spreadsheet.
//!
//! The schema is ordered configuration, nothing more: the reconciliation
//! engine walks it top to bottom so comparison output is deterministic and
//! every field appears exactly once. Field names match the source
//! spreadsheet columns verbatim (including accents and the literal quotes
//! in the fuel column) because exports and operators address fields by
//! that exact name.

/// One comparable field: its spreadsheet name and whether the two parties'
/// values are compared numerically (1% tolerance) or as text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub numeric: bool,
}

/// All comparable fields, in spreadsheet column order.
pub const COMPARISON_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "Empresa", numeric: false },
    FieldSpec { name: "Master", numeric: false },
    FieldSpec { name: "House", numeric: false },
    FieldSpec { name: "Data House", numeric: false },
    FieldSpec { name: "Prioridade", numeric: false },
    FieldSpec { name: "Origem", numeric: false },
    FieldSpec { name: "Destino", numeric: false },
    FieldSpec { name: "Peso Bruto", numeric: true },
    FieldSpec { name: "Peso Cubado", numeric: true },
    FieldSpec { name: "Peso Taxado", numeric: true },
    FieldSpec { name: "PTAX (Bacen)", numeric: true },
    FieldSpec { name: "Dimensões", numeric: false },
    FieldSpec { name: "Ítem Especial Tabela PGL", numeric: false },
    FieldSpec { name: "Rate Frete", numeric: true },
    FieldSpec { name: "Rate Screening Fee", numeric: true },
    FieldSpec { name: "Rate Security Fee", numeric: true },
    FieldSpec { name: "Frete EUR", numeric: true },
    FieldSpec { name: "Screening Fee EUR", numeric: true },
    FieldSpec { name: "Security Fee EUR", numeric: true },
    FieldSpec { name: "Combustível \"Fuel\" EUR", numeric: true },
    FieldSpec { name: "Total PGL EUR", numeric: true },
    FieldSpec { name: "Total PGL R$", numeric: true },
];

/// Look up a field by its exact name.
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    COMPARISON_FIELDS.iter().find(|f| f.name == name)
}

/// Whether a field is compared numerically. Unknown names are not numeric.
pub fn is_numeric_field(name: &str) -> bool {
    field_spec(name).map(|f| f.numeric).unwrap_or(false)
}
