use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumString};

/// Mounting variant of the installation. Each variant has its own base
/// cost-per-kW entry in the catalog settings.
///
/// The upstream settings feed spells these in camelCase (`onRoof`,
/// `aluminiumConstructionOnRoof`, ...); `FromStr` accepts both that wire
/// form and the snake_case form `Display` emits.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
pub enum InstallationType {
    #[strum(
        to_string = "aluminium_construction_on_roof",
        serialize = "aluminiumConstructionOnRoof"
    )]
    AluminiumConstructionOnRoof,
    #[strum(
        to_string = "metal_construction_on_roof",
        serialize = "metalConstructionOnRoof"
    )]
    MetalConstructionOnRoof,
    #[strum(to_string = "on_roof", serialize = "onRoof")]
    OnRoof,
    #[strum(to_string = "system_on_ground", serialize = "systemOnGround")]
    SystemOnGround,
}

/// Rate tables loaded from the data provider. Installation cost is keyed by
/// mounting variant, profit by warranty years. The two percentages may be
/// absent upstream; the composer falls back to 0 for those (and only those).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostSettings {
    pub installation_cost_per_kw: HashMap<InstallationType, f64>,
    pub profit_per_kw: HashMap<u32, f64>,
    pub sales_commission_pct: Option<f64>,
    pub contingency_pct: Option<f64>,
}

/// How much of the internal cost breakdown a caller gets back.
/// `Detailed` corresponds to the original admin view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailLevel {
    #[default]
    Summary,
    Detailed,
}

/// Result of one pricing run. `final_total` is the loan principal fed to
/// the loan option generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingBreakdown {
    pub system_power_kw: f64,
    pub selected_panels: String,
    pub selected_inverter: String,
    pub final_total: f64,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<BreakdownDetail>,
}

/// Step-by-step cost composition, returned only at `DetailLevel::Detailed`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BreakdownDetail {
    pub base_installation_cost: f64,
    pub profit_amount: f64,
    pub inverter_cost: f64,
    pub panel_cost: f64,
    pub subtotal: f64,
    pub commission_amount: f64,
    pub contingency_amount: f64,
    pub installation_cost_per_kw: f64,
    pub profit_per_kw: f64,
    pub sales_commission_pct: f64,
    pub contingency_pct: f64,
}
