use ordered_float::OrderedFloat;
use tracing::debug;

use crate::domain::{BankOffer, LoanQuote};
use crate::error::{QuoteError, Result};

/// Expands every bank offer into an amortized loan quote for the given
/// principal. Quotes come back sorted ascending by monthly payment.
pub fn generate(principal: f64, offers: &[BankOffer]) -> Result<Vec<LoanQuote>> {
    if !(principal > 0.0) {
        return Err(QuoteError::InvalidPrincipal(principal));
    }

    let mut quotes: Vec<LoanQuote> = offers
        .iter()
        .map(|offer| quote_offer(principal, offer))
        .collect();
    quotes.sort_by_key(|q| OrderedFloat(q.monthly_payment));

    debug!(principal, quotes = quotes.len(), "loan options generated");
    Ok(quotes)
}

fn quote_offer(principal: f64, offer: &BankOffer) -> LoanQuote {
    let period = offer.period_months;
    let monthly_rate = offer.interest_rate / 12.0;

    let (monthly_payment, total_interest, total_amount) =
        if offer.interest_rate == 0.0 || monthly_rate == 0.0 {
            (principal / period as f64, 0.0, principal)
        } else {
            let growth = (1.0 + monthly_rate).powi(period as i32);
            let monthly_payment = principal * monthly_rate * growth / (growth - 1.0);
            let total_amount = monthly_payment * period as f64;
            (monthly_payment, total_amount - principal, total_amount)
        };

    LoanQuote {
        bank_name: offer.bank_name.clone(),
        interest_rate: offer.interest_rate,
        commission_rate: offer.commission_rate,
        period_months: period,
        principal,
        monthly_payment,
        total_interest,
        total_amount,
    }
}
