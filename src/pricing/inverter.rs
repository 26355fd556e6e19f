use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::domain::InverterModel;
use crate::error::{QuoteError, Result};

/// The "15% rule": an inverter is admissible when its continuous rating
/// covers the system power net of a 15% derating allowance.
pub const SIZING_HEADROOM: f64 = 1.15;

/// How the inverter for a quote is chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum InverterSelection {
    /// Smallest admissible inverter under the sizing rule.
    Auto,
    /// Exact catalog lookup by brand and rated power.
    Manual { brand: String, rated_power_kw: f64 },
}

/// Minimum admissible rated power for a target system power.
pub fn min_rated_power_kw(target_power_kw: f64) -> f64 {
    target_power_kw / SIZING_HEADROOM
}

/// All admissible inverters, sorted ascending by rated power. The first
/// entry is the auto-mode default.
pub fn admissible(target_power_kw: f64, inverters: &[InverterModel]) -> Vec<InverterModel> {
    let min_kw = min_rated_power_kw(target_power_kw);
    inverters
        .iter()
        .filter(|inv| inv.rated_power_kw >= min_kw)
        .cloned()
        .sorted_by_key(|inv| OrderedFloat(inv.rated_power_kw))
        .collect()
}

/// Resolves the inverter for a quote. Auto mode needs a positive target
/// power (the sizing rule is vacuous otherwise) and fails with
/// `NoSuitableInverter` rather than silently picking an undersized unit;
/// manual mode fails with `InverterNotFound` when the exact (brand, rated
/// power) pair is not in the catalog.
pub fn select(
    target_power_kw: f64,
    mode: &InverterSelection,
    inverters: &[InverterModel],
) -> Result<InverterModel> {
    match mode {
        InverterSelection::Auto => {
            if !(target_power_kw > 0.0) {
                return Err(QuoteError::InvalidInput(
                    "system power must be positive for auto inverter sizing".into(),
                ));
            }
            admissible(target_power_kw, inverters)
                .into_iter()
                .next()
                .ok_or(QuoteError::NoSuitableInverter {
                    target_kw: target_power_kw,
                    min_kw: min_rated_power_kw(target_power_kw),
                })
        }
        InverterSelection::Manual {
            brand,
            rated_power_kw,
        } => inverters
            .iter()
            .find(|inv| inv.brand == *brand && inv.rated_power_kw == *rated_power_kw)
            .cloned()
            .ok_or_else(|| QuoteError::InverterNotFound {
                brand: brand.clone(),
                rated_power_kw: *rated_power_kw,
            }),
    }
}

/// Distinct brands in catalog order, for manual-mode pickers.
pub fn brands(inverters: &[InverterModel]) -> Vec<String> {
    inverters
        .iter()
        .map(|inv| inv.brand.clone())
        .unique()
        .collect()
}

/// Distinct rated powers offered by one brand, ascending.
pub fn rated_powers_for_brand(inverters: &[InverterModel], brand: &str) -> Vec<f64> {
    inverters
        .iter()
        .filter(|inv| inv.brand == brand)
        .map(|inv| OrderedFloat(inv.rated_power_kw))
        .unique()
        .sorted()
        .map(|kw| kw.0)
        .collect()
}
