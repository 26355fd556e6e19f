use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::domain::{
    BankRateSheet, CostSettings, InstallationType, InverterModel, PanelModel, RateTier,
};

/// Abstract data provider the engine loads its catalog from. The concrete
/// transport (REST/JSON, fixtures, ...) is the implementor's business.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn fetch_panels(&self) -> Result<Vec<PanelModel>>;
    async fn fetch_inverters(&self) -> Result<Vec<InverterModel>>;
    async fn fetch_bank_sheets(&self) -> Result<Vec<BankRateSheet>>;
    async fn fetch_cost_settings(&self) -> Result<CostSettings>;
}

/// REST client for the upstream catalog API. Every response is wrapped in a
/// `{success, data}` envelope; `success == false` counts as a failed fetch.
#[derive(Clone)]
pub struct HttpCatalogProvider {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCatalogProvider {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("solar-quote-engine/0.2"));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_data<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {path} failed"))?;
        let status = resp.status();
        if !status.is_success() {
            bail!("catalog API error: HTTP {status} for {path}");
        }
        let envelope: Envelope<T> = resp
            .json()
            .await
            .with_context(|| format!("{path} JSON parse failed"))?;
        if !envelope.success {
            bail!("catalog API reported failure for {path}");
        }
        envelope
            .data
            .with_context(|| format!("{path} returned no data"))
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalogProvider {
    async fn fetch_panels(&self) -> Result<Vec<PanelModel>> {
        let data: PanelsData = self.get_data("/api/panels").await?;
        Ok(data
            .panels
            .into_iter()
            .map(|p| PanelModel {
                brand: p.brand,
                wattage: p.wattage,
                unit_price: p.price,
            })
            .collect())
    }

    async fn fetch_inverters(&self) -> Result<Vec<InverterModel>> {
        let data: InvertersData = self.get_data("/api/inverters").await?;
        Ok(data
            .inverters
            .into_iter()
            .map(|i| InverterModel {
                brand: i.brand,
                model: i.model,
                rated_power_kw: i.kw,
                price: i.price,
            })
            .collect())
    }

    async fn fetch_bank_sheets(&self) -> Result<Vec<BankRateSheet>> {
        let data: BanksData = self.get_data("/api/banks").await?;
        Ok(data
            .banks
            .into_iter()
            .map(|b| BankRateSheet {
                bank_name: b.name,
                offers: b
                    .options
                    .into_iter()
                    .map(|o| RateTier {
                        interest_rate: o.interest_rate,
                        commission_rate: o.commission,
                        periods: o.periods,
                    })
                    .collect(),
            })
            .collect())
    }

    async fn fetch_cost_settings(&self) -> Result<CostSettings> {
        let data: SettingsData = self.get_data("/api/system-cost-settings").await?;
        Ok(parse_cost_settings(data))
    }
}

/// Upstream settings arrive as flat key/value groups
/// (`onRoof_cost_per_kw`, `profit_per_kw_12Y`, `sales_team_pct`, ...); the
/// installation-type prefix is the upstream's camelCase spelling.
/// Unrecognized keys are logged and skipped; percentage values are given in
/// percent units and converted to decimals here.
fn parse_cost_settings(data: SettingsData) -> CostSettings {
    let mut installation_cost_per_kw = HashMap::new();
    for (key, setting) in data.installation_costs.data {
        match key
            .strip_suffix("_cost_per_kw")
            .and_then(|t| InstallationType::from_str(t).ok())
        {
            Some(installation_type) => {
                installation_cost_per_kw.insert(installation_type, setting.value);
            }
            None => warn!(key, "skipping unrecognized installation cost key"),
        }
    }

    let mut profit_per_kw = HashMap::new();
    for (key, setting) in data.profit_margins.data {
        match key
            .strip_prefix("profit_per_kw_")
            .and_then(|y| y.strip_suffix('Y'))
            .and_then(|y| y.parse::<u32>().ok())
        {
            Some(years) => {
                profit_per_kw.insert(years, setting.value);
            }
            None => warn!(key, "skipping unrecognized profit margin key"),
        }
    }

    let sales_commission_pct = data
        .sales_commissions
        .data
        .get("sales_team_pct")
        .map(|s| s.value / 100.0);
    let contingency_pct = data
        .unanticipated_expenses
        .data
        .get("unanticipated_expenses_pct")
        .map(|s| s.value / 100.0);

    CostSettings {
        installation_cost_per_kw,
        profit_per_kw,
        sales_commission_pct,
        contingency_pct,
    }
}

// Wire shapes for the upstream API.

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct PanelsData {
    panels: Vec<WirePanel>,
}

#[derive(Debug, Deserialize)]
struct WirePanel {
    brand: String,
    wattage: u32,
    price: f64,
}

#[derive(Debug, Deserialize)]
struct InvertersData {
    inverters: Vec<WireInverter>,
}

#[derive(Debug, Deserialize)]
struct WireInverter {
    brand: String,
    model: String,
    kw: f64,
    price: f64,
}

#[derive(Debug, Deserialize)]
struct BanksData {
    banks: Vec<WireBank>,
}

#[derive(Debug, Deserialize)]
struct WireBank {
    name: String,
    options: Vec<WireRateOption>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRateOption {
    interest_rate: f64,
    commission: f64,
    periods: Vec<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsData {
    installation_costs: SettingGroup,
    profit_margins: SettingGroup,
    sales_commissions: SettingGroup,
    unanticipated_expenses: SettingGroup,
}

#[derive(Debug, Deserialize)]
struct SettingGroup {
    #[serde(default)]
    data: HashMap<String, SettingValue>,
}

#[derive(Debug, Deserialize)]
struct SettingValue {
    value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(entries: &[(&str, f64)]) -> SettingGroup {
        SettingGroup {
            data: entries
                .iter()
                .map(|(k, v)| (k.to_string(), SettingValue { value: *v }))
                .collect(),
        }
    }

    #[test]
    fn parses_flat_setting_keys() {
        let settings = parse_cost_settings(SettingsData {
            installation_costs: group(&[
                ("onRoof_cost_per_kw", 105_000.0),
                ("systemOnGround_cost_per_kw", 117_000.0),
                ("bogus_key", 1.0),
            ]),
            profit_margins: group(&[("profit_per_kw_12Y", 30_000.0), ("profit_per_kw_2Y", 15_000.0)]),
            sales_commissions: group(&[("sales_team_pct", 6.0)]),
            unanticipated_expenses: group(&[("unanticipated_expenses_pct", 2.0)]),
        });

        assert_eq!(
            settings.installation_cost_per_kw[&InstallationType::OnRoof],
            105_000.0
        );
        assert_eq!(settings.installation_cost_per_kw.len(), 2);
        assert_eq!(settings.profit_per_kw[&12], 30_000.0);
        assert_eq!(settings.sales_commission_pct, Some(0.06));
        assert_eq!(settings.contingency_pct, Some(0.02));
    }

    #[test]
    fn accepts_every_installation_key_the_upstream_sends() {
        let settings = parse_cost_settings(SettingsData {
            installation_costs: group(&[
                ("aluminiumConstructionOnRoof_cost_per_kw", 130_000.0),
                ("metalConstructionOnRoof_cost_per_kw", 120_000.0),
                ("onRoof_cost_per_kw", 105_000.0),
                ("systemOnGround_cost_per_kw", 117_000.0),
            ]),
            profit_margins: group(&[]),
            sales_commissions: group(&[]),
            unanticipated_expenses: group(&[]),
        });

        assert_eq!(settings.installation_cost_per_kw.len(), 4);
        assert_eq!(
            settings.installation_cost_per_kw[&InstallationType::AluminiumConstructionOnRoof],
            130_000.0
        );
        assert_eq!(
            settings.installation_cost_per_kw[&InstallationType::MetalConstructionOnRoof],
            120_000.0
        );
    }

    #[test]
    fn missing_percentage_groups_stay_none() {
        let settings = parse_cost_settings(SettingsData {
            installation_costs: group(&[("on_roof_cost_per_kw", 105_000.0)]),
            profit_margins: group(&[]),
            sales_commissions: group(&[]),
            unanticipated_expenses: group(&[]),
        });
        assert_eq!(settings.sales_commission_pct, None);
        assert_eq!(settings.contingency_pct, None);
    }
}
