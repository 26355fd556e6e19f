pub mod costs;
pub mod inverter;
pub mod loan;
pub mod panel;

pub use costs::{
    BreakdownDetail, CostSettings, DetailLevel, InstallationType, PricingBreakdown,
};
pub use inverter::InverterModel;
pub use loan::{BankOffer, BankRateSheet, LoanQuote, RateTier};
pub use panel::{AccuracyTier, PanelConfiguration, PanelModel, PriceTag};
