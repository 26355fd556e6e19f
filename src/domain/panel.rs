use serde::{Deserialize, Serialize};
use std::fmt;

/// A panel product from the catalog. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelModel {
    pub brand: String,
    /// Rated output of a single panel in watts.
    pub wattage: u32,
    /// Price of a single panel in the catalog currency.
    pub unit_price: f64,
}

impl PanelModel {
    pub fn price_per_watt(&self) -> f64 {
        self.unit_price / self.wattage as f64
    }
}

/// Accuracy band of a candidate configuration relative to the requested
/// system power.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccuracyTier {
    Perfect,
    VeryClose,
    Close,
    Acceptable,
}

impl AccuracyTier {
    pub fn from_accuracy(power_accuracy: f64) -> Self {
        if power_accuracy >= 95.0 {
            Self::Perfect
        } else if power_accuracy >= 90.0 {
            Self::VeryClose
        } else if power_accuracy >= 80.0 {
            Self::Close
        } else {
            Self::Acceptable
        }
    }
}

impl fmt::Display for AccuracyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Perfect => "Perfect match",
            Self::VeryClose => "Very close",
            Self::Close => "Close",
            Self::Acceptable => "Acceptable",
        };
        write!(f, "{s}")
    }
}

/// Marks the cheapest / most expensive entry within one result set.
/// Only assigned when the set actually has price variation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PriceTag {
    LowestPrice,
    HighestPrice,
}

/// A candidate panel count for one panel model. Derived fresh on every
/// search; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelConfiguration {
    pub brand: String,
    pub wattage: u32,
    pub quantity: u32,
    /// quantity * wattage / 1000, in kW. Always derived, never set directly.
    pub actual_power_kw: f64,
    pub total_price: f64,
    pub price_per_watt: f64,
    /// 0..=100; 100 only when the actual power hits the target exactly.
    pub power_accuracy: f64,
    pub accuracy_tier: AccuracyTier,
    pub price_tag: Option<PriceTag>,
}

impl PanelConfiguration {
    pub fn new(model: &PanelModel, quantity: u32, target_power_kw: f64) -> Self {
        let actual_power_kw = (quantity * model.wattage) as f64 / 1000.0;
        let power_difference = (actual_power_kw - target_power_kw).abs();
        let power_accuracy = (100.0 - power_difference / target_power_kw * 100.0).max(0.0);
        Self {
            brand: model.brand.clone(),
            wattage: model.wattage,
            quantity,
            actual_power_kw,
            total_price: quantity as f64 * model.unit_price,
            price_per_watt: model.price_per_watt(),
            power_accuracy,
            accuracy_tier: AccuracyTier::from_accuracy(power_accuracy),
            price_tag: None,
        }
    }

    /// Deduplication identity within one search result set.
    pub fn identity_key(&self) -> (String, u32, u32) {
        (self.brand.clone(), self.wattage, self.quantity)
    }
}

impl fmt::Display for PanelConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {} {}W = {:.2} kW",
            self.quantity, self.brand, self.wattage, self.actual_power_kw
        )
    }
}
