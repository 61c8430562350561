//! Installment calculator.
//!
//! Derives the monthly installment, total markup, total payable and
//! effective rate of one payment plan from its cash price, down payment,
//! tenure and interest model. The calculator is a pure, total function:
//! out-of-domain inputs are clamped rather than rejected, and every figure
//! is carried in `rust_decimal::Decimal` and rounded to two places half
//! away from zero.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::model::InterestModel;
use crate::time_value::level_payment;
use crate::types::{round_output, with_metadata, ComputationOutput, Money, Percent};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);
pub const DEFAULT_TENURE_MONTHS: i32 = 12;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// Everything needed to price one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancingInput {
    /// Cash price of the product, shared by all of its plans.
    pub cash_price: Money,
    #[serde(default)]
    pub down_payment: Money,
    #[serde(default = "default_tenure")]
    pub tenure_months: i32,
    #[serde(default, rename = "interestType", alias = "interestModel")]
    pub interest_model: InterestModel,
    /// Annual rate in percent. Input for flat and reducing-balance plans.
    #[serde(default)]
    pub interest_rate_percent: Percent,
    /// Total profit amount. Input for profit-based plans.
    #[serde(default)]
    pub markup_amount: Money,
}

pub(crate) fn default_tenure() -> i32 {
    DEFAULT_TENURE_MONTHS
}

/// Figures derived for one plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancingOutput {
    /// Cash price minus down payment, never negative.
    pub financed_amount: Money,
    pub monthly_installment: Money,
    pub total_markup: Money,
    /// Financed amount plus total markup.
    pub total_payable: Money,
    /// Cash price plus total markup.
    pub total_cost_to_customer: Money,
    /// Annual rate in percent; derived for profit-based plans.
    pub effective_rate_percent: Percent,
}

/// Inputs after clamping to the calculator's safe domain.
struct ClampedInput {
    cash_price: Money,
    down_payment: Money,
    tenure_months: u32,
    rate_percent: Percent,
    markup_amount: Money,
}

impl ClampedInput {
    fn from_input(input: &FinancingInput, warnings: &mut Vec<String>) -> Self {
        let cash_price = non_negative("cash price", input.cash_price, warnings);
        let down_payment = non_negative("down payment", input.down_payment, warnings);
        if down_payment > cash_price {
            warnings.push(format!(
                "Down payment {down_payment} exceeds cash price {cash_price}; financed amount clamped to 0"
            ));
        }

        let tenure_months = if input.tenure_months > 0 {
            input.tenure_months as u32
        } else {
            warnings.push(format!(
                "Tenure of {} months is not positive; installment and markup are 0",
                input.tenure_months
            ));
            0
        };

        Self {
            cash_price,
            down_payment,
            tenure_months,
            rate_percent: non_negative("interest rate", input.interest_rate_percent, warnings),
            markup_amount: non_negative("markup amount", input.markup_amount, warnings),
        }
    }

    fn financed_amount(&self) -> Money {
        (self.cash_price - self.down_payment).max(Decimal::ZERO)
    }
}

fn non_negative(name: &str, value: Decimal, warnings: &mut Vec<String>) -> Decimal {
    if value < Decimal::ZERO {
        warnings.push(format!("Negative {name} {value} clamped to 0"));
        Decimal::ZERO
    } else {
        value
    }
}

fn saturating_sum(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or(Decimal::MAX)
}

/// Unrounded figures produced by one model branch.
struct RawFigures {
    monthly_installment: Money,
    total_markup: Money,
    effective_rate_percent: Percent,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the financing figures for one plan.
///
/// Never fails and never panics; see the module docs for the clamping rules.
pub fn compute(input: &FinancingInput) -> FinancingOutput {
    compute_inner(input, &mut Vec::new())
}

/// [`compute`] wrapped in the standard metadata envelope, with one warning
/// per clamp that was applied to the input.
pub fn compute_with_metadata(input: &FinancingInput) -> ComputationOutput<FinancingOutput> {
    let start = Instant::now();
    let mut warnings = Vec::new();
    let output = compute_inner(input, &mut warnings);
    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        methodology(input.interest_model),
        input,
        warnings,
        elapsed,
        output,
    )
}

fn methodology(model: InterestModel) -> &'static str {
    match model {
        InterestModel::FlatRate => "Flat rate: markup = financed x rate x tenure / 12",
        InterestModel::ReducingBalance => {
            "Reducing balance: level installment by standard amortization at rate / 12 per month"
        }
        InterestModel::IslamicProfitBased => {
            "Profit based: fixed markup spread evenly, effective rate = markup / cash price"
        }
    }
}

// ---------------------------------------------------------------------------
// Model branches
// ---------------------------------------------------------------------------

fn compute_inner(input: &FinancingInput, warnings: &mut Vec<String>) -> FinancingOutput {
    let clamped = ClampedInput::from_input(input, warnings);
    if !warnings.is_empty() {
        debug!(?warnings, "financing input clamped");
    }

    let financed = clamped.financed_amount();
    let raw = match input.interest_model {
        InterestModel::FlatRate => flat_rate(&clamped, financed),
        InterestModel::ReducingBalance => reducing_balance(&clamped, financed),
        InterestModel::IslamicProfitBased => profit_based(&clamped, financed),
    };

    let financed_amount = round_output(financed);
    let total_markup = round_output(raw.total_markup);

    FinancingOutput {
        financed_amount,
        monthly_installment: round_output(raw.monthly_installment),
        total_markup,
        total_payable: saturating_sum(financed_amount, total_markup),
        total_cost_to_customer: round_output(saturating_sum(clamped.cash_price, total_markup)),
        effective_rate_percent: round_output(raw.effective_rate_percent),
    }
}

fn flat_rate(c: &ClampedInput, financed: Money) -> RawFigures {
    let mut figures = RawFigures {
        monthly_installment: Decimal::ZERO,
        total_markup: Decimal::ZERO,
        effective_rate_percent: c.rate_percent,
    };
    if c.tenure_months == 0 {
        return figures;
    }

    let tenure = Decimal::from(c.tenure_months);
    let years = tenure / MONTHS_PER_YEAR;
    let markup = financed
        .checked_mul(c.rate_percent / PERCENT)
        .and_then(|m| m.checked_mul(years))
        .unwrap_or(Decimal::MAX);
    figures.total_markup = markup;
    figures.monthly_installment = saturating_sum(financed, markup) / tenure;
    figures
}

fn reducing_balance(c: &ClampedInput, financed: Money) -> RawFigures {
    let mut figures = RawFigures {
        monthly_installment: Decimal::ZERO,
        total_markup: Decimal::ZERO,
        effective_rate_percent: c.rate_percent,
    };
    if c.tenure_months == 0 {
        return figures;
    }

    let periodic_rate = c.rate_percent / PERCENT / MONTHS_PER_YEAR;
    let installment = level_payment(financed, periodic_rate, c.tenure_months);
    let payable = installment
        .checked_mul(Decimal::from(c.tenure_months))
        .unwrap_or(Decimal::MAX);

    figures.monthly_installment = installment;
    // Rounding noise can leave payable a hair under principal at tiny rates.
    figures.total_markup = (payable - financed).max(Decimal::ZERO);
    figures
}

fn profit_based(c: &ClampedInput, financed: Money) -> RawFigures {
    let markup = c.markup_amount;
    let effective_rate_percent = if c.cash_price > Decimal::ZERO {
        markup
            .checked_div(c.cash_price)
            .and_then(|r| r.checked_mul(PERCENT))
            .unwrap_or(Decimal::MAX)
    } else {
        Decimal::ZERO
    };

    let monthly_installment = if c.tenure_months > 0 {
        saturating_sum(financed, markup) / Decimal::from(c.tenure_months)
    } else {
        Decimal::ZERO
    };

    RawFigures {
        monthly_installment,
        total_markup: markup,
        effective_rate_percent,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input(model: InterestModel) -> FinancingInput {
        FinancingInput {
            cash_price: dec!(100000),
            down_payment: dec!(20000),
            tenure_months: 12,
            interest_model: model,
            interest_rate_percent: dec!(12),
            markup_amount: dec!(9600),
        }
    }

    #[test]
    fn test_flat_rate_reference_scenario() {
        let out = compute(&input(InterestModel::FlatRate));
        assert_eq!(
            out,
            FinancingOutput {
                financed_amount: dec!(80000),
                monthly_installment: dec!(7466.67),
                total_markup: dec!(9600),
                total_payable: dec!(89600),
                total_cost_to_customer: dec!(109600),
                effective_rate_percent: dec!(12),
            }
        );
    }

    #[test]
    fn test_profit_based_reference_scenario() {
        let out = compute(&input(InterestModel::IslamicProfitBased));
        assert_eq!(out.effective_rate_percent, dec!(9.6));
        assert_eq!(out.total_payable, dec!(89600));
        assert_eq!(out.monthly_installment, dec!(7466.67));
        assert_eq!(out.total_cost_to_customer, dec!(109600));
    }

    #[test]
    fn test_reducing_balance_reference_scenario() {
        let out = compute(&input(InterestModel::ReducingBalance));
        assert_eq!(out.monthly_installment, dec!(7107.90));
        assert_eq!(out.total_markup, dec!(5294.84));
        assert_eq!(out.total_payable, dec!(85294.84));
        assert_eq!(out.effective_rate_percent, dec!(12));
    }

    #[test]
    fn test_flat_rate_ignores_markup_input() {
        let mut i = input(InterestModel::FlatRate);
        i.markup_amount = dec!(1);
        assert_eq!(compute(&i).total_markup, dec!(9600));
    }

    #[test]
    fn test_profit_based_ignores_rate_input() {
        let mut i = input(InterestModel::IslamicProfitBased);
        i.interest_rate_percent = dec!(99);
        assert_eq!(compute(&i).effective_rate_percent, dec!(9.6));
    }

    #[test]
    fn test_zero_tenure_zeroes_rate_dependent_outputs() {
        for model in InterestModel::ALL {
            let mut i = input(model);
            i.tenure_months = 0;
            let out = compute(&i);
            assert_eq!(out.monthly_installment, Decimal::ZERO, "{model}");
        }
    }

    #[test]
    fn test_negative_tenure_flat_rate_has_no_negative_markup() {
        let mut i = input(InterestModel::FlatRate);
        i.tenure_months = -24;
        let out = compute(&i);
        assert_eq!(out.total_markup, Decimal::ZERO);
        assert_eq!(out.total_payable, dec!(80000));
    }

    #[test]
    fn test_profit_based_zero_price() {
        let mut i = input(InterestModel::IslamicProfitBased);
        i.cash_price = Decimal::ZERO;
        i.down_payment = Decimal::ZERO;
        let out = compute(&i);
        assert_eq!(out.effective_rate_percent, Decimal::ZERO);
        assert_eq!(out.total_markup, dec!(9600));
        assert_eq!(out.monthly_installment, dec!(800));
    }

    #[test]
    fn test_down_payment_above_price_clamps_financed_amount() {
        let mut i = input(InterestModel::FlatRate);
        i.down_payment = dec!(150000);
        let out = compute(&i);
        assert_eq!(out.financed_amount, Decimal::ZERO);
        assert_eq!(out.total_markup, Decimal::ZERO);
        assert_eq!(out.total_cost_to_customer, dec!(100000));
    }

    #[test]
    fn test_zero_rate_reducing_balance_is_straight_line() {
        let mut i = input(InterestModel::ReducingBalance);
        i.interest_rate_percent = Decimal::ZERO;
        let out = compute(&i);
        assert_eq!(out.monthly_installment, dec!(6666.67));
        assert_eq!(out.total_markup, Decimal::ZERO);
        assert_eq!(out.total_payable, dec!(80000));
    }

    #[test]
    fn test_metadata_lists_clamps() {
        let mut i = input(InterestModel::FlatRate);
        i.tenure_months = 0;
        i.interest_rate_percent = dec!(-5);
        let out = compute_with_metadata(&i);
        assert_eq!(out.warnings.len(), 2);
        assert!(out.methodology.starts_with("Flat rate"));
        assert_eq!(out.result.effective_rate_percent, Decimal::ZERO);
    }

    #[test]
    fn test_metadata_clean_input_has_no_warnings() {
        let out = compute_with_metadata(&input(InterestModel::ReducingBalance));
        assert!(out.warnings.is_empty());
        assert_eq!(out.assumptions["interestType"], "ReducingBalance");
    }

    #[test]
    fn test_extreme_inputs_do_not_panic() {
        let i = FinancingInput {
            cash_price: Decimal::MAX,
            down_payment: Decimal::ZERO,
            tenure_months: i32::MAX,
            interest_model: InterestModel::ReducingBalance,
            interest_rate_percent: dec!(1000),
            markup_amount: Decimal::ZERO,
        };
        for model in InterestModel::ALL {
            let _ = compute(&FinancingInput {
                interest_model: model,
                ..i.clone()
            });
        }
    }

    #[test]
    fn test_deserialize_host_record_defaults() {
        let i: FinancingInput =
            serde_json::from_str(r#"{"cashPrice": "50000", "interestType": "reducing"}"#).unwrap();
        assert_eq!(i.tenure_months, 12);
        assert_eq!(i.interest_model, InterestModel::ReducingBalance);
        assert_eq!(i.down_payment, Decimal::ZERO);
    }
}
