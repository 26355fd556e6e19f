use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{Display, EnumString};

use crate::domain::LoanQuote;

/// Sortable columns of the loan-offer table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortField {
    BankName,
    InterestRate,
    LoanPeriod,
    MonthlyPayment,
    TotalAmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Session-local sort state for loan quotes. Sorting on the active field
/// flips the direction; sorting on a new field resets to ascending. The
/// state lives for the session and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteSorter {
    field: SortField,
    direction: SortDirection,
}

impl Default for QuoteSorter {
    /// Matches the generator's default ordering.
    fn default() -> Self {
        Self {
            field: SortField::MonthlyPayment,
            direction: SortDirection::Ascending,
        }
    }
}

impl QuoteSorter {
    pub fn field(&self) -> SortField {
        self.field
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Applies the toggle rule for `field`, then stably sorts `quotes`
    /// under the resulting state.
    pub fn sort(&mut self, quotes: &mut [LoanQuote], field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Ascending;
        }
        self.apply(quotes);
    }

    /// Re-sorts under the current state without toggling.
    pub fn apply(&self, quotes: &mut [LoanQuote]) {
        let field = self.field;
        quotes.sort_by(|a, b| {
            let ord = compare_by(field, a, b);
            match self.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }
}

fn compare_by(field: SortField, a: &LoanQuote, b: &LoanQuote) -> Ordering {
    match field {
        SortField::BankName => a
            .bank_name
            .to_lowercase()
            .cmp(&b.bank_name.to_lowercase()),
        SortField::InterestRate => {
            OrderedFloat(a.interest_rate).cmp(&OrderedFloat(b.interest_rate))
        }
        SortField::LoanPeriod => a.period_months.cmp(&b.period_months),
        SortField::MonthlyPayment => {
            OrderedFloat(a.monthly_payment).cmp(&OrderedFloat(b.monthly_payment))
        }
        SortField::TotalAmount => {
            OrderedFloat(a.total_amount).cmp(&OrderedFloat(b.total_amount))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(bank: &str, rate: f64, period: u32, monthly: f64) -> LoanQuote {
        LoanQuote {
            bank_name: bank.into(),
            interest_rate: rate,
            commission_rate: 0.1,
            period_months: period,
            principal: 1_000_000.0,
            monthly_payment: monthly,
            total_interest: monthly * period as f64 - 1_000_000.0,
            total_amount: monthly * period as f64,
        }
    }

    fn sample() -> Vec<LoanQuote> {
        vec![
            quote("acba bank", 0.11, 96, 16_000.0),
            quote("ArmEconomBank", 0.0, 36, 33_000.0),
            quote("ArmEconomBank", 0.15, 84, 19_000.0),
        ]
    }

    #[test]
    fn new_field_sorts_ascending() {
        let mut sorter = QuoteSorter::default();
        let mut quotes = sample();
        sorter.sort(&mut quotes, SortField::InterestRate);
        let rates: Vec<f64> = quotes.iter().map(|q| q.interest_rate).collect();
        assert_eq!(rates, vec![0.0, 0.11, 0.15]);
        assert_eq!(sorter.direction(), SortDirection::Ascending);
    }

    #[test]
    fn repeated_field_flips_to_the_reverse_order() {
        let mut sorter = QuoteSorter::default();
        let mut quotes = sample();
        sorter.sort(&mut quotes, SortField::TotalAmount);
        let ascending: Vec<u32> = quotes.iter().map(|q| q.period_months).collect();

        sorter.sort(&mut quotes, SortField::TotalAmount);
        let descending: Vec<u32> = quotes.iter().map(|q| q.period_months).collect();
        assert_eq!(
            descending,
            ascending.iter().rev().copied().collect::<Vec<_>>()
        );
        assert_eq!(sorter.direction(), SortDirection::Descending);
    }

    #[test]
    fn switching_fields_resets_to_ascending() {
        let mut sorter = QuoteSorter::default();
        let mut quotes = sample();
        sorter.sort(&mut quotes, SortField::LoanPeriod);
        sorter.sort(&mut quotes, SortField::LoanPeriod); // now descending
        sorter.sort(&mut quotes, SortField::BankName);
        assert_eq!(sorter.field(), SortField::BankName);
        assert_eq!(sorter.direction(), SortDirection::Ascending);
    }

    #[test]
    fn bank_names_compare_case_insensitively() {
        let mut sorter = QuoteSorter::default();
        let mut quotes = sample();
        sorter.sort(&mut quotes, SortField::BankName);
        assert_eq!(quotes[0].bank_name, "acba bank");
        assert_eq!(quotes[1].bank_name, "ArmEconomBank");
    }

    #[test]
    fn first_sort_on_the_default_field_flips_direction() {
        // The generator already orders by monthly payment ascending, so the
        // first explicit sort on that column goes descending.
        let mut sorter = QuoteSorter::default();
        let mut quotes = sample();
        sorter.sort(&mut quotes, SortField::MonthlyPayment);
        assert_eq!(sorter.direction(), SortDirection::Descending);
        assert!(quotes[0].monthly_payment >= quotes[1].monthly_payment);
    }
}
