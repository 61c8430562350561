//! Side-by-side comparison of the plans offered on one product.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculator::FinancingOutput;
use super::plan_set::PlanSet;
use crate::error::InstallmentError;
use crate::types::Money;
use crate::InstallmentResult;

/// Which plan wins on each headline figure. Ties go to the lower index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanComparison {
    pub plan_count: usize,
    pub lowest_installment_index: usize,
    pub lowest_total_cost_index: usize,
    pub lowest_effective_rate_index: usize,
    /// Most expensive minus cheapest total cost to customer.
    pub total_cost_spread: Money,
}

pub fn compare_plans(set: &PlanSet) -> InstallmentResult<PlanComparison> {
    if set.is_empty() {
        return Err(InstallmentError::InsufficientData(
            "Plan comparison requires at least 1 plan".into(),
        ));
    }

    let outputs: Vec<&FinancingOutput> = set.plans().iter().map(|p| p.output()).collect();
    let costs = outputs.iter().map(|o| o.total_cost_to_customer);
    let max_cost = costs.clone().max().unwrap_or(Decimal::ZERO);
    let min_cost = costs.min().unwrap_or(Decimal::ZERO);

    Ok(PlanComparison {
        plan_count: outputs.len(),
        lowest_installment_index: argmin(&outputs, |o| o.monthly_installment),
        lowest_total_cost_index: argmin(&outputs, |o| o.total_cost_to_customer),
        lowest_effective_rate_index: argmin(&outputs, |o| o.effective_rate_percent),
        total_cost_spread: max_cost - min_cost,
    })
}

fn argmin(outputs: &[&FinancingOutput], key: impl Fn(&FinancingOutput) -> Decimal) -> usize {
    let mut best = 0;
    for (i, o) in outputs.iter().enumerate().skip(1) {
        if key(*o) < key(outputs[best]) {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financing::model::InterestModel;
    use crate::financing::plan_set::PlanInput;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_set_is_rejected() {
        let set = PlanSet::new(dec!(1000));
        assert!(matches!(
            compare_plans(&set),
            Err(InstallmentError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_flat_vs_reducing_vs_long_tenure() {
        let mut set = PlanSet::new(dec!(100000));
        let base = PlanInput {
            down_payment: dec!(20000),
            interest_rate_percent: dec!(12),
            ..PlanInput::default()
        };
        set.add_plan(base.clone());
        set.add_plan(PlanInput {
            interest_model: InterestModel::ReducingBalance,
            ..base.clone()
        });
        set.add_plan(PlanInput {
            tenure_months: 36,
            ..base
        });

        let cmp = compare_plans(&set).unwrap();
        assert_eq!(cmp.plan_count, 3);
        // 36 months at flat 12% spreads 108,800 over 36 → 3,022.22
        assert_eq!(cmp.lowest_installment_index, 2);
        assert_eq!(cmp.lowest_total_cost_index, 1);
        // Every plan quotes 12%, the first one wins the tie
        assert_eq!(cmp.lowest_effective_rate_index, 0);
        // 128,800 - 105,294.84
        assert_eq!(cmp.total_cost_spread, dec!(23505.16));
    }
}
