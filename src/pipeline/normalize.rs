//! Row normalisation: one spreadsheet row → one [`CardRecord`] of strings.
//!
//! Coercion rules, applied to every field:
//!
//! | Cell | Field value |
//! |------|-------------|
//! | blank / missing | `""` |
//! | float | integer part, truncated toward zero (`4.0` → `"4"`) |
//! | anything else | its plain text form |
//!
//! Stats are stored as floats by most spreadsheet tools even when they are
//! whole numbers, hence the truncation.

use crate::error::CardgenError;
use crate::pipeline::sheet::{CellValue, SheetRow};
use crate::pipeline::template::Replacements;

/// Template field name → spreadsheet column, in substitution order.
pub const FIELD_COLUMNS: [(&str, &str); 8] = [
    ("name", "Name"),
    ("description", "Description"),
    ("b", "B"),
    ("m", "M"),
    ("effect_1", "Effect L"),
    ("sym_1", "Sym L"),
    ("effect_2", "Effect R"),
    ("sym_2", "Sym R"),
];

/// Column selecting the template variant.
pub const TEMPLATE_COLUMN: &str = "Template";

/// One card's normalised fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    /// 1-based spreadsheet row the card came from.
    pub row: usize,
    /// The eight template fields, keyed by field name.
    pub fields: Replacements,
    /// Template variant, e.g. `light` for `creature_light.svg`.
    pub template: String,
}

impl CardRecord {
    /// Normalise `row`, failing if it has no template column or its name
    /// cannot be used as a file name.
    pub fn from_row(row: &SheetRow) -> Result<Self, CardgenError> {
        let template = match row.get(TEMPLATE_COLUMN) {
            Some(cell) => cell_to_string(cell),
            None => {
                return Err(CardgenError::MissingColumn {
                    row: row.number,
                    column: TEMPLATE_COLUMN.to_string(),
                })
            }
        };
        let record = Self {
            row: row.number,
            fields: normalize_row(row),
            template,
        };
        record.validate_name()?;
        Ok(record)
    }

    pub fn name(&self) -> &str {
        self.fields.get("name").unwrap_or_default()
    }

    /// The name doubles as output and artwork file name, so it must be a
    /// single non-empty path component.
    fn validate_name(&self) -> Result<(), CardgenError> {
        let name = self.name();
        let unusable = name.trim().is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0']);
        if unusable {
            return Err(CardgenError::InvalidCardName {
                row: self.row,
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

/// Map a row onto the eight template fields. Every field is present in the
/// result, blank if its column is missing or empty.
pub fn normalize_row(row: &SheetRow) -> Replacements {
    FIELD_COLUMNS
        .iter()
        .map(|(field, column)| {
            let value = row.get(column).map(cell_to_string).unwrap_or_default();
            (field.to_string(), value)
        })
        .collect()
}

/// Apply the coercion rules to a single cell.
pub fn cell_to_string(cell: &CellValue) -> String {
    match cell {
        CellValue::Empty => String::new(),
        CellValue::Float(f) if !f.is_finite() => String::new(),
        CellValue::Float(f) => float_to_integer_string(*f),
        CellValue::Int(i) => i.to_string(),
        CellValue::Bool(true) => "True".to_string(),
        CellValue::Bool(false) => "False".to_string(),
        CellValue::Text(s) => s.clone(),
    }
}

/// Integer part of a finite float, at any magnitude, without a `-0`.
fn float_to_integer_string(f: f64) -> String {
    let t = f.trunc();
    if t == 0.0 {
        return "0".to_string();
    }
    format!("{t:.0}")
}
