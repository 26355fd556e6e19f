pub mod composer;
pub mod inverter;
pub mod loan;
pub mod panel_search;
pub mod sort;

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::config::SessionConfig;
use crate::domain::{
    DetailLevel, InstallationType, InverterModel, LoanQuote, PanelConfiguration,
    PricingBreakdown,
};
use crate::error::{QuoteError, Result};

pub use inverter::InverterSelection;
pub use sort::{QuoteSorter, SortDirection, SortField};

/// Everything one quoting session mutates. Owned exclusively by its
/// `QuoteSession`; concurrent sessions each hold their own.
#[derive(Debug, Clone)]
pub struct PricingContext {
    pub target_power_kw: f64,
    pub warranty_years: u32,
    pub installation_type: InstallationType,
    pub selected_panel: Option<PanelConfiguration>,
    pub selected_inverter: Option<InverterModel>,
    pub manual_inverter_mode: bool,
    pub manual_panel_mode: bool,
}

/// One full calculation cycle: the priced system plus its financing options.
#[derive(Debug, Clone)]
pub struct QuoteResult {
    pub breakdown: PricingBreakdown,
    pub loan_options: Vec<LoanQuote>,
}

/// A single user's calculation session over one immutable catalog snapshot.
/// Replaces the original module-level selection state with an explicit
/// object; every recalculation is a plain method call, scheduling policies
/// like debouncing belong to the caller.
pub struct QuoteSession {
    id: Uuid,
    catalog: Arc<Catalog>,
    context: PricingContext,
    sorter: QuoteSorter,
}

impl QuoteSession {
    pub fn new(catalog: Arc<Catalog>, defaults: &SessionConfig) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            catalog,
            context: PricingContext {
                target_power_kw: 0.0,
                warranty_years: defaults.default_warranty_years,
                installation_type: defaults.default_installation_type,
                selected_panel: None,
                selected_inverter: None,
                manual_inverter_mode: false,
                manual_panel_mode: false,
            },
            sorter: QuoteSorter::default(),
        };
        info!(session = %session.id, "quote session opened");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn context(&self) -> &PricingContext {
        &self.context
    }

    pub fn set_warranty_years(&mut self, years: u32) {
        self.context.warranty_years = years;
    }

    pub fn set_installation_type(&mut self, installation_type: InstallationType) {
        self.context.installation_type = installation_type;
    }

    /// Runs the panel-configuration search for a new target power,
    /// default-selecting the best hit and refreshing the auto inverter
    /// choice. A non-positive target clears the current selection and
    /// returns no suggestions.
    pub fn search_panels(&mut self, target_power_kw: f64) -> Vec<PanelConfiguration> {
        self.context.target_power_kw = target_power_kw;
        let suggestions = panel_search::search(target_power_kw, &self.catalog.panels);
        if target_power_kw > 0.0 && self.catalog.panels.is_empty() {
            // Catalog not populated: warn-logged no-op, current pick stands.
            return suggestions;
        }
        self.context.selected_panel = suggestions.first().cloned();
        self.refresh_auto_inverter();
        suggestions
    }

    /// Pins a configuration picked from earlier search results.
    pub fn select_panel(&mut self, config: PanelConfiguration) {
        self.context.selected_panel = Some(config);
    }

    /// Manual panel entry: the target system power is derived from the
    /// chosen quantity rather than the other way around.
    pub fn set_manual_panel(
        &mut self,
        brand: &str,
        wattage: u32,
        quantity: u32,
    ) -> Result<PanelConfiguration> {
        if quantity < 1 {
            return Err(QuoteError::InvalidInput(
                "panel quantity must be at least 1".into(),
            ));
        }
        let model = self
            .catalog
            .panels
            .iter()
            .find(|p| p.brand == brand && p.wattage == wattage)
            .ok_or_else(|| {
                QuoteError::InvalidInput(format!("no catalog panel {brand} {wattage}W"))
            })?;

        let derived_target_kw = (quantity * wattage) as f64 / 1000.0;
        let config = PanelConfiguration::new(model, quantity, derived_target_kw);
        self.context.target_power_kw = derived_target_kw;
        self.context.selected_panel = Some(config.clone());
        self.refresh_auto_inverter();
        Ok(config)
    }

    /// Resolves and pins the inverter. Auto mode applies the sizing rule
    /// against the current target power; failures are surfaced, never
    /// papered over with an undersized unit.
    pub fn select_inverter(&mut self, mode: &InverterSelection) -> Result<InverterModel> {
        let picked = inverter::select(
            self.context.target_power_kw,
            mode,
            &self.catalog.inverters,
        )?;
        self.context.manual_inverter_mode =
            matches!(mode, InverterSelection::Manual { .. });
        self.context.selected_inverter = Some(picked.clone());
        Ok(picked)
    }

    /// Mode toggles reset current selections; stale picks from the other
    /// mode must not leak into the next calculation.
    pub fn set_manual_panel_mode(&mut self, enabled: bool) {
        if self.context.manual_panel_mode != enabled {
            self.context.manual_panel_mode = enabled;
            self.reset_selections();
        }
    }

    pub fn set_manual_inverter_mode(&mut self, enabled: bool) {
        if self.context.manual_inverter_mode != enabled {
            self.context.manual_inverter_mode = enabled;
            self.reset_selections();
        }
    }

    /// Prices the currently selected system. Fails when the target power or
    /// either required selection is missing; the caller decides how to
    /// present that, but must not proceed with a partial quote.
    pub fn compute_price(&self, detail: DetailLevel) -> Result<PricingBreakdown> {
        if !(self.context.target_power_kw > 0.0) {
            return Err(QuoteError::InvalidInput(
                "system power must be positive".into(),
            ));
        }
        let panel = self
            .context
            .selected_panel
            .as_ref()
            .ok_or_else(|| QuoteError::InvalidInput("no panel configuration selected".into()))?;
        let inverter = self
            .context
            .selected_inverter
            .as_ref()
            .ok_or_else(|| QuoteError::InvalidInput("no inverter selected".into()))?;

        composer::compose(
            self.context.target_power_kw,
            self.context.installation_type,
            self.context.warranty_years,
            panel,
            inverter,
            &self.catalog.cost_settings,
            detail,
        )
    }

    /// Amortized offers for an already-computed principal.
    pub fn generate_loan_options(&self, principal: f64) -> Result<Vec<LoanQuote>> {
        loan::generate(principal, &self.catalog.bank_offers())
    }

    /// Re-orders quotes through the session's sticky sort state.
    pub fn sort_quotes(&mut self, quotes: &mut [LoanQuote], field: SortField) {
        self.sorter.sort(quotes, field);
    }

    /// The explicit selection-changed cascade: price the system, expand the
    /// financing options, return both under the default ordering.
    pub fn recalculate(&mut self, detail: DetailLevel) -> Result<QuoteResult> {
        let breakdown = self.compute_price(detail)?;
        let loan_options = self.generate_loan_options(breakdown.final_total)?;
        info!(
            session = %self.id,
            final_total = breakdown.final_total,
            options = loan_options.len(),
            "quote recalculated"
        );
        Ok(QuoteResult {
            breakdown,
            loan_options,
        })
    }

    // The sorter deliberately survives selection resets; the last sort
    // field and direction are remembered for the whole session.
    fn reset_selections(&mut self) {
        self.context.selected_panel = None;
        self.context.selected_inverter = None;
    }

    fn refresh_auto_inverter(&mut self) {
        if self.context.manual_inverter_mode {
            return;
        }
        // Best-effort refresh; a sizing failure (including a non-positive
        // target) clears the pick and is surfaced when the caller explicitly
        // selects or recalculates.
        self.context.selected_inverter = inverter::select(
            self.context.target_power_kw,
            &InverterSelection::Auto,
            &self.catalog.inverters,
        )
        .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BankRateSheet, CostSettings, InverterModel, PanelModel, RateTier};
    use std::collections::HashMap;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog {
            panels: vec![
                PanelModel {
                    brand: "LA Solar".into(),
                    wattage: 580,
                    unit_price: 39_000.0,
                },
                PanelModel {
                    brand: "Jinko Solar".into(),
                    wattage: 500,
                    unit_price: 44_000.0,
                },
            ],
            inverters: vec![
                InverterModel {
                    brand: "Solax".into(),
                    model: "X1".into(),
                    rated_power_kw: 5.3,
                    price: 237_600.0,
                },
                InverterModel {
                    brand: "Solax".into(),
                    model: "X3".into(),
                    rated_power_kw: 10.0,
                    price: 432_000.0,
                },
            ],
            banks: vec![BankRateSheet {
                bank_name: "ArmEconomBank".into(),
                offers: vec![RateTier {
                    interest_rate: 0.12,
                    commission_rate: 0.11,
                    periods: vec![36, 60, 84],
                }],
            }],
            cost_settings: CostSettings {
                installation_cost_per_kw: HashMap::from([(
                    InstallationType::OnRoof,
                    105_000.0,
                )]),
                profit_per_kw: HashMap::from([(12, 30_000.0)]),
                sales_commission_pct: Some(0.06),
                contingency_pct: Some(0.02),
            },
        })
    }

    fn defaults() -> SessionConfig {
        SessionConfig {
            default_warranty_years: 12,
            default_installation_type: InstallationType::OnRoof,
        }
    }

    fn session() -> QuoteSession {
        QuoteSession::new(catalog(), &defaults())
    }

    #[test]
    fn search_auto_selects_best_panel_and_inverter() {
        let mut s = session();
        let suggestions = s.search_panels(5.3);
        assert!(!suggestions.is_empty());
        assert_eq!(s.context().selected_panel, Some(suggestions[0].clone()));
        // 5.3 kW target: smallest admissible inverter is the 5.3 kW unit.
        assert_eq!(
            s.context().selected_inverter.as_ref().unwrap().rated_power_kw,
            5.3
        );
    }

    #[test]
    fn non_positive_target_clears_selection() {
        let mut s = session();
        s.search_panels(5.3);
        let suggestions = s.search_panels(0.0);
        assert!(suggestions.is_empty());
        assert!(s.context().selected_panel.is_none());
        // The auto inverter pick must go too; sizing against a zero target
        // would otherwise pin the smallest unit in the catalog.
        assert!(s.context().selected_inverter.is_none());
    }

    #[test]
    fn auto_inverter_selection_requires_a_positive_target() {
        let mut s = session();
        assert!(matches!(
            s.select_inverter(&InverterSelection::Auto).unwrap_err(),
            QuoteError::InvalidInput(_)
        ));
    }

    #[test]
    fn manual_panel_derives_target_power() {
        let mut s = session();
        let config = s.set_manual_panel("Jinko Solar", 500, 12).unwrap();
        assert_eq!(config.actual_power_kw, 6.0);
        assert_eq!(s.context().target_power_kw, 6.0);
        assert_eq!(config.power_accuracy, 100.0);
        // Auto inverter refreshed for the derived power: 6/1.15 = 5.217.
        assert_eq!(
            s.context().selected_inverter.as_ref().unwrap().rated_power_kw,
            5.3
        );
    }

    #[test]
    fn manual_panel_must_exist_in_catalog() {
        let mut s = session();
        assert!(matches!(
            s.set_manual_panel("Trina", 600, 9).unwrap_err(),
            QuoteError::InvalidInput(_)
        ));
        assert!(matches!(
            s.set_manual_panel("Jinko Solar", 500, 0).unwrap_err(),
            QuoteError::InvalidInput(_)
        ));
    }

    #[test]
    fn mode_toggle_resets_selections() {
        let mut s = session();
        s.search_panels(5.3);
        assert!(s.context().selected_panel.is_some());

        s.set_manual_panel_mode(true);
        assert!(s.context().selected_panel.is_none());
        assert!(s.context().selected_inverter.is_none());

        // Toggling to the already-active mode is a no-op.
        s.search_panels(5.3);
        s.set_manual_panel_mode(true);
        assert!(s.context().selected_panel.is_some());
    }

    #[test]
    fn compute_price_requires_both_selections() {
        let mut s = session();
        assert!(matches!(
            s.compute_price(DetailLevel::Summary).unwrap_err(),
            QuoteError::InvalidInput(_)
        ));

        s.search_panels(5.3);
        s.context.selected_inverter = None;
        assert!(matches!(
            s.compute_price(DetailLevel::Summary).unwrap_err(),
            QuoteError::InvalidInput(_)
        ));
    }

    #[test]
    fn recalculate_produces_price_and_sorted_loans() {
        let mut s = session();
        s.search_panels(5.3);
        let result = s.recalculate(DetailLevel::Detailed).unwrap();

        assert!(result.breakdown.final_total > 0.0);
        assert!(result.breakdown.detail.is_some());
        assert_eq!(result.loan_options.len(), 3);
        for pair in result.loan_options.windows(2) {
            assert!(pair[0].monthly_payment <= pair[1].monthly_payment);
        }
        assert_eq!(
            result.loan_options[0].principal,
            result.breakdown.final_total
        );
    }

    #[test]
    fn session_sort_state_is_sticky() {
        let mut s = session();
        s.search_panels(5.3);
        let mut quotes = s.recalculate(DetailLevel::Summary).unwrap().loan_options;

        s.sort_quotes(&mut quotes, SortField::LoanPeriod);
        let ascending: Vec<u32> = quotes.iter().map(|q| q.period_months).collect();
        assert_eq!(ascending, vec![36, 60, 84]);

        s.sort_quotes(&mut quotes, SortField::LoanPeriod);
        let descending: Vec<u32> = quotes.iter().map(|q| q.period_months).collect();
        assert_eq!(descending, vec![84, 60, 36]);
    }
}
