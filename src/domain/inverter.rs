use serde::{Deserialize, Serialize};
use std::fmt;

/// An inverter product from the catalog. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InverterModel {
    pub brand: String,
    pub model: String,
    /// Continuous AC rating in kW.
    pub rated_power_kw: f64,
    pub price: f64,
}

impl fmt::Display for InverterModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} kW", self.brand, self.model, self.rated_power_kw)
    }
}
