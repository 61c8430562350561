//! Payment plans of one product and their recalculation.
//!
//! A [`PlanSet`] owns the product's cash price and every plan offered on
//! it. Each mutating operation recomputes the affected plans before it
//! returns, so a plan read through the public accessors always reflects its
//! current inputs and the current price. Plans are only handed out by
//! shared reference; there is no way to edit a plan's inputs without going
//! through the set.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, info};

use super::calculator::{compute, default_tenure, FinancingInput, FinancingOutput};
use super::model::InterestModel;
use crate::error::InstallmentError;
use crate::types::{Money, Percent};
use crate::InstallmentResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Per-plan inputs. The cash price lives on the [`PlanSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    #[serde(default)]
    pub down_payment: Money,
    #[serde(default = "default_tenure")]
    pub tenure_months: i32,
    #[serde(default, rename = "interestType", alias = "interestModel")]
    pub interest_model: InterestModel,
    #[serde(default)]
    pub interest_rate_percent: Percent,
    #[serde(default)]
    pub markup_amount: Money,
}

impl Default for PlanInput {
    fn default() -> Self {
        Self {
            down_payment: Decimal::ZERO,
            tenure_months: default_tenure(),
            interest_model: InterestModel::FlatRate,
            interest_rate_percent: Decimal::ZERO,
            markup_amount: Decimal::ZERO,
        }
    }
}

impl PlanInput {
    /// Combine with the product's cash price into a calculator input.
    pub fn with_cash_price(&self, cash_price: Money) -> FinancingInput {
        FinancingInput {
            cash_price,
            down_payment: self.down_payment,
            tenure_months: self.tenure_months,
            interest_model: self.interest_model,
            interest_rate_percent: self.interest_rate_percent,
            markup_amount: self.markup_amount,
        }
    }

    fn apply(&mut self, field: PlanField) {
        match field {
            PlanField::DownPayment(v) => self.down_payment = v,
            PlanField::TenureMonths(v) => self.tenure_months = v,
            PlanField::InterestModel(v) => self.interest_model = v,
            PlanField::InterestRatePercent(v) => self.interest_rate_percent = v,
            PlanField::MarkupAmount(v) => self.markup_amount = v,
        }
    }
}

/// One plan: its inputs and the figures computed from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    input: PlanInput,
    output: FinancingOutput,
}

impl Plan {
    pub fn input(&self) -> &PlanInput {
        &self.input
    }

    pub fn output(&self) -> &FinancingOutput {
        &self.output
    }

    fn priced(input: PlanInput, cash_price: Money) -> Self {
        let output = compute(&input.with_cash_price(cash_price));
        Self { input, output }
    }

    fn recompute(&mut self, cash_price: Money) {
        self.output = compute(&self.input.with_cash_price(cash_price));
    }
}

/// A single input field of a plan, carrying its new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanField {
    DownPayment(Money),
    TenureMonths(i32),
    InterestModel(InterestModel),
    InterestRatePercent(Percent),
    MarkupAmount(Money),
}

impl PlanField {
    /// Build a field update from a host field name and a JSON value.
    ///
    /// Names are matched ignoring case and underscores, so both
    /// `downPayment` and `down_payment` work. Numbers may arrive as JSON
    /// numbers or numeric strings.
    pub fn from_raw(name: &str, value: &Value) -> InstallmentResult<Self> {
        let key: String = name
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "downpayment" => Ok(PlanField::DownPayment(decimal_value(name, value)?)),
            "tenure" | "tenuremonths" => Ok(PlanField::TenureMonths(tenure_value(name, value)?)),
            "interesttype" | "interestmodel" => match value {
                Value::String(s) => s
                    .parse()
                    .map(PlanField::InterestModel)
                    .map_err(|e: InstallmentError| invalid(name, e.to_string())),
                other => Err(invalid(name, format!("expected a string, got {other}"))),
            },
            "rate" | "interestrate" | "interestratepercent" => {
                Ok(PlanField::InterestRatePercent(decimal_value(name, value)?))
            }
            "markup" | "markupamount" => Ok(PlanField::MarkupAmount(decimal_value(name, value)?)),
            _ => Err(invalid(name, "not an editable plan field".into())),
        }
    }
}

fn invalid(field: &str, reason: String) -> InstallmentError {
    InstallmentError::InvalidField {
        field: field.to_string(),
        reason,
    }
}

fn decimal_value(field: &str, value: &Value) -> InstallmentResult<Decimal> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => return Err(invalid(field, format!("expected a number, got {other}"))),
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| invalid(field, format!("'{text}' is not a decimal: {e}")))
}

fn tenure_value(field: &str, value: &Value) -> InstallmentResult<i32> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| invalid(field, format!("expected a whole number of months, got {value}")))
}

// ---------------------------------------------------------------------------
// Persisted representation
// ---------------------------------------------------------------------------

/// Flat plan record as exchanged with the host and its storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRecord {
    #[serde(default)]
    pub down_payment: Money,
    #[serde(default = "default_tenure")]
    pub tenure_months: i32,
    #[serde(default, rename = "interestType", alias = "interestModel")]
    pub interest_model: InterestModel,
    #[serde(default)]
    pub interest_rate_percent: Percent,
    #[serde(default)]
    pub markup_amount: Money,
    #[serde(default)]
    pub financed_amount: Money,
    #[serde(default)]
    pub monthly_installment: Money,
    #[serde(default)]
    pub total_markup: Money,
    #[serde(default)]
    pub total_payable: Money,
    #[serde(default)]
    pub total_cost_to_customer: Money,
    #[serde(default)]
    pub effective_rate_percent: Percent,
}

impl PlanRecord {
    pub fn input(&self) -> PlanInput {
        PlanInput {
            down_payment: self.down_payment,
            tenure_months: self.tenure_months,
            interest_model: self.interest_model,
            interest_rate_percent: self.interest_rate_percent,
            markup_amount: self.markup_amount,
        }
    }
}

impl From<&Plan> for PlanRecord {
    fn from(plan: &Plan) -> Self {
        let (i, o) = (&plan.input, &plan.output);
        Self {
            down_payment: i.down_payment,
            tenure_months: i.tenure_months,
            interest_model: i.interest_model,
            interest_rate_percent: i.interest_rate_percent,
            markup_amount: i.markup_amount,
            financed_amount: o.financed_amount,
            monthly_installment: o.monthly_installment,
            total_markup: o.total_markup,
            total_payable: o.total_payable,
            total_cost_to_customer: o.total_cost_to_customer,
            effective_rate_percent: o.effective_rate_percent,
        }
    }
}

/// A product's price stored once, plus its plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSetRecord {
    pub cash_price: Money,
    #[serde(default)]
    pub plans: Vec<PlanRecord>,
}

// ---------------------------------------------------------------------------
// PlanSet
// ---------------------------------------------------------------------------

/// All payment plans of one product, kept consistent with the shared price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSet {
    cash_price: Money,
    plans: Vec<Plan>,
}

impl PlanSet {
    pub fn new(cash_price: Money) -> Self {
        Self {
            cash_price,
            plans: Vec::new(),
        }
    }

    /// Rebuild a set from its stored form.
    ///
    /// Output fields in the record are ignored and every plan is
    /// recomputed, since stored figures may predate the current inputs.
    pub fn from_record(record: &PlanSetRecord) -> Self {
        let plans = record
            .plans
            .iter()
            .map(|r| Plan::priced(r.input(), record.cash_price))
            .collect();
        debug!(plans = record.plans.len(), "plan set loaded from record");
        Self {
            cash_price: record.cash_price,
            plans,
        }
    }

    pub fn to_record(&self) -> PlanSetRecord {
        PlanSetRecord {
            cash_price: self.cash_price,
            plans: self.plans.iter().map(PlanRecord::from).collect(),
        }
    }

    pub fn cash_price(&self) -> Money {
        self.cash_price
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn plan(&self, index: usize) -> Option<&Plan> {
        self.plans.get(index)
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Change the shared price and recompute every plan against it.
    pub fn set_cash_price(&mut self, new_price: Money) {
        info!(
            old = %self.cash_price,
            new = %new_price,
            plans = self.plans.len(),
            "repricing plan set"
        );
        self.cash_price = new_price;
        for plan in &mut self.plans {
            plan.recompute(new_price);
        }
    }

    /// Change one input field of one plan and recompute that plan only.
    pub fn update_plan_field(&mut self, index: usize, field: PlanField) -> InstallmentResult<&Plan> {
        let len = self.plans.len();
        let cash_price = self.cash_price;
        let plan = self
            .plans
            .get_mut(index)
            .ok_or(InstallmentError::PlanIndexOutOfRange { index, len })?;

        plan.input.apply(field);
        plan.recompute(cash_price);
        debug!(index, ?field, model = %plan.input.interest_model, "plan recomputed");
        Ok(&*plan)
    }

    /// [`update_plan_field`](Self::update_plan_field) from a host field name
    /// and JSON value. Nothing is mutated if the name or value is rejected.
    pub fn update_plan_field_raw(
        &mut self,
        index: usize,
        name: &str,
        value: &Value,
    ) -> InstallmentResult<&Plan> {
        let field = PlanField::from_raw(name, value)?;
        self.update_plan_field(index, field)
    }

    /// Price a new plan and append it. Returns its index.
    pub fn add_plan(&mut self, initial: PlanInput) -> usize {
        let plan = Plan::priced(initial, self.cash_price);
        self.plans.push(plan);
        let index = self.plans.len() - 1;
        debug!(index, "plan added");
        index
    }

    /// Append a plan with default inputs (flat rate, 12 months, no rate).
    pub fn add_default_plan(&mut self) -> usize {
        self.add_plan(PlanInput::default())
    }

    pub fn remove_plan(&mut self, index: usize) -> InstallmentResult<Plan> {
        let len = self.plans.len();
        if index >= len {
            return Err(InstallmentError::PlanIndexOutOfRange { index, len });
        }
        debug!(index, "plan removed");
        Ok(self.plans.remove(index))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
