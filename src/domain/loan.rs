use serde::{Deserialize, Serialize};

/// One bank's rate card as published by the data provider: each tier pairs
/// an interest rate and a sales commission with the periods it applies to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BankRateSheet {
    pub bank_name: String,
    pub offers: Vec<RateTier>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateTier {
    /// Annual interest rate as a decimal (0.12 = 12%).
    pub interest_rate: f64,
    /// Commission rate as a decimal.
    pub commission_rate: f64,
    /// Loan periods in months this tier is offered for.
    pub periods: Vec<u32>,
}

impl BankRateSheet {
    /// Flattens the sheet into one `BankOffer` per (tier, period) pair.
    pub fn flatten(&self) -> impl Iterator<Item = BankOffer> + '_ {
        self.offers.iter().flat_map(move |tier| {
            tier.periods.iter().map(move |&period_months| BankOffer {
                bank_name: self.bank_name.clone(),
                interest_rate: tier.interest_rate,
                commission_rate: tier.commission_rate,
                period_months,
            })
        })
    }
}

/// A single financing option: one bank, one rate/commission tier, one period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BankOffer {
    pub bank_name: String,
    pub interest_rate: f64,
    pub commission_rate: f64,
    pub period_months: u32,
}

/// An amortized loan offer for a concrete principal. Computed fresh per
/// pricing run; lifetime is one calculation cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoanQuote {
    pub bank_name: String,
    pub interest_rate: f64,
    pub commission_rate: f64,
    pub period_months: u32,
    pub principal: f64,
    pub monthly_payment: f64,
    pub total_interest: f64,
    pub total_amount: f64,
}
