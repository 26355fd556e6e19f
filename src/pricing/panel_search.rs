use itertools::Itertools;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use tracing::{debug, warn};

use crate::domain::{PanelConfiguration, PanelModel, PriceTag};

/// How many ranked suggestions a search returns at most.
pub const MAX_SUGGESTIONS: usize = 9;

/// Candidate quantities are explored this far on each side of the rounded
/// target quantity.
const QUANTITY_SPREAD: i64 = 2;

/// Enumerates candidate panel-count configurations for the requested system
/// power, ranked by power accuracy.
///
/// Per model the quantity window is `[max(1, t-2), t+2]` around the rounded
/// target quantity. Candidates from all models are pooled, sorted descending
/// by accuracy (stable on ties), deduplicated by (brand, wattage, quantity)
/// keeping the first occurrence, and truncated to the top nine. The cheapest
/// and most expensive entries of the final set are tagged when the set has
/// any price variation.
///
/// A non-positive target yields an empty result; an empty catalog is logged
/// as a warning, not an error.
pub fn search(target_power_kw: f64, panels: &[PanelModel]) -> Vec<PanelConfiguration> {
    if !(target_power_kw > 0.0) {
        return Vec::new();
    }
    if panels.is_empty() {
        warn!("panel search invoked with an empty catalog");
        return Vec::new();
    }

    let mut candidates: Vec<PanelConfiguration> = Vec::new();
    for model in panels {
        let target_quantity =
            (target_power_kw * 1000.0 / model.wattage as f64).round() as i64;
        let min_quantity = (target_quantity - QUANTITY_SPREAD).max(1);
        let max_quantity = target_quantity + QUANTITY_SPREAD;
        for quantity in min_quantity..=max_quantity {
            candidates.push(PanelConfiguration::new(model, quantity as u32, target_power_kw));
        }
    }

    candidates.sort_by_key(|c| Reverse(OrderedFloat(c.power_accuracy)));

    let mut best: Vec<PanelConfiguration> = candidates
        .into_iter()
        .unique_by(|c| c.identity_key())
        .take(MAX_SUGGESTIONS)
        .collect();

    apply_price_tags(&mut best);

    debug!(
        target_power_kw,
        suggestions = best.len(),
        "panel search complete"
    );
    best
}

/// Tags the first entry (in ranked order) holding the minimum total price
/// and the first holding the maximum. Skipped entirely when all entries
/// share one price.
fn apply_price_tags(configs: &mut [PanelConfiguration]) {
    let Some(min_price) = configs.iter().map(|c| OrderedFloat(c.total_price)).min() else {
        return;
    };
    let max_price = configs
        .iter()
        .map(|c| OrderedFloat(c.total_price))
        .max()
        .unwrap_or(min_price);
    if min_price == max_price {
        return;
    }

    if let Some(cheapest) = configs
        .iter_mut()
        .find(|c| OrderedFloat(c.total_price) == min_price)
    {
        cheapest.price_tag = Some(PriceTag::LowestPrice);
    }
    if let Some(priciest) = configs
        .iter_mut()
        .find(|c| OrderedFloat(c.total_price) == max_price)
    {
        priciest.price_tag = Some(PriceTag::HighestPrice);
    }
}
