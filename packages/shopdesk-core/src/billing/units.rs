//! Quantity conversion between units.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Multiplies `quantity` by `conversion_factor`.
///
/// # Errors
/// `CoreError::Validation` when the factor is zero, negative or not finite,
/// or the quantity is not finite.
pub fn convert(quantity: f64, conversion_factor: f64) -> Result<f64> {
    if !conversion_factor.is_finite() || conversion_factor <= 0.0 {
        return Err(CoreError::validation(
            "conversionFactor",
            format!("must be a positive number, got {}", conversion_factor),
        ));
    }
    if !quantity.is_finite() {
        return Err(CoreError::validation("quantity", "must be a finite number"));
    }
    Ok(quantity * conversion_factor)
}

/// A named conversion, e.g. kg → g with factor 1000.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitConversion {
    pub base_unit: String,
    pub target_unit: String,
    pub factor: f64,
}

impl UnitConversion {
    /// Converts a quantity in the base unit to the target unit.
    pub fn apply(&self, quantity: f64) -> Result<f64> {
        convert(quantity, self.factor)
    }
}
