use chrono::Utc;
use tracing::debug;

use crate::domain::{
    BreakdownDetail, CostSettings, DetailLevel, InstallationType, InverterModel,
    PanelConfiguration, PricingBreakdown,
};
use crate::error::{QuoteError, Result};

/// Composes the final system price. All components are additive in a fixed
/// order; nothing compounds:
///
/// ```text
/// subtotal    = base + profit + inverter + panels
/// final_total = subtotal + subtotal*commission_pct + subtotal*contingency_pct
/// ```
///
/// A missing installation-cost or profit key is `MissingRateData`. The two
/// percentages alone fall back to 0 when absent upstream.
#[allow(clippy::too_many_arguments)]
pub fn compose(
    target_power_kw: f64,
    installation_type: InstallationType,
    warranty_years: u32,
    panel: &PanelConfiguration,
    inverter: &InverterModel,
    settings: &CostSettings,
    detail: DetailLevel,
) -> Result<PricingBreakdown> {
    if !(target_power_kw > 0.0) {
        return Err(QuoteError::InvalidInput(format!(
            "system power must be positive, got {target_power_kw}"
        )));
    }

    let installation_cost_per_kw = *settings
        .installation_cost_per_kw
        .get(&installation_type)
        .ok_or_else(|| {
            QuoteError::MissingRateData(format!(
                "no installation cost for type {installation_type}"
            ))
        })?;
    let profit_per_kw = *settings.profit_per_kw.get(&warranty_years).ok_or_else(|| {
        QuoteError::MissingRateData(format!(
            "no profit margin for {warranty_years}-year warranty"
        ))
    })?;
    let sales_commission_pct = settings.sales_commission_pct.unwrap_or(0.0);
    let contingency_pct = settings.contingency_pct.unwrap_or(0.0);

    let base_installation_cost = target_power_kw * installation_cost_per_kw;
    let profit_amount = target_power_kw * profit_per_kw;
    let inverter_cost = inverter.price;
    let panel_cost = panel.total_price;
    let subtotal = base_installation_cost + profit_amount + inverter_cost + panel_cost;
    let commission_amount = subtotal * sales_commission_pct;
    let contingency_amount = subtotal * contingency_pct;
    let final_total = subtotal + commission_amount + contingency_amount;

    debug!(
        target_power_kw,
        %installation_type,
        warranty_years,
        final_total,
        "price composed"
    );

    Ok(PricingBreakdown {
        system_power_kw: target_power_kw,
        selected_panels: panel.to_string(),
        selected_inverter: inverter.to_string(),
        final_total,
        generated_at: Utc::now(),
        detail: match detail {
            DetailLevel::Summary => None,
            DetailLevel::Detailed => Some(BreakdownDetail {
                base_installation_cost,
                profit_amount,
                inverter_cost,
                panel_cost,
                subtotal,
                commission_amount,
                contingency_amount,
                installation_cost_per_kw,
                profit_per_kw,
                sales_commission_pct,
                contingency_pct,
            }),
        },
    })
}
