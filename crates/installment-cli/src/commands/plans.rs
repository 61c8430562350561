use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use installment_core::{compare_plans, PlanSet, PlanSetRecord};

use crate::input;

/// Arguments for recalculating a stored plan set
#[derive(Args)]
pub struct PlansArgs {
    /// Path to JSON/YAML plan set record
    #[arg(long)]
    pub input: Option<String>,

    /// Reprice every plan at this cash price
    #[arg(long)]
    pub cash_price: Option<Decimal>,
}

/// Arguments for editing one field of one plan
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct UpdateArgs {
    /// Path to JSON/YAML plan set record
    #[arg(long)]
    pub input: Option<String>,

    /// Zero-based index of the plan to edit
    #[arg(long)]
    pub plan: usize,

    /// Field name, e.g. downPayment, tenureMonths, interestType
    #[arg(long)]
    pub field: String,

    /// New value; parsed as JSON when possible, otherwise taken as a string
    #[arg(long)]
    pub value: String,
}

/// Arguments for comparing the plans of one product
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON/YAML plan set record
    #[arg(long)]
    pub input: Option<String>,
}

fn load_plan_set(path: Option<&str>, what: &str) -> Result<PlanSet, Box<dyn std::error::Error>> {
    let record: PlanSetRecord = input::read_input(path, what)?;
    Ok(PlanSet::from_record(&record))
}

pub fn run_plans(args: PlansArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut set = load_plan_set(args.input.as_deref(), "plan recalculation")?;
    if let Some(price) = args.cash_price {
        set.set_cash_price(price);
    }
    Ok(serde_json::to_value(set.to_record())?)
}

pub fn run_update(args: UpdateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut set = load_plan_set(args.input.as_deref(), "plan update")?;
    let value = parse_cli_value(&args.value);
    set.update_plan_field_raw(args.plan, &args.field, &value)?;
    Ok(serde_json::to_value(set.to_record())?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let set = load_plan_set(args.input.as_deref(), "plan comparison")?;
    let comparison = compare_plans(&set)?;
    Ok(serde_json::to_value(comparison)?)
}

/// `24` and `"24"` both reach the core as JSON; bare words such as
/// `reducing` become strings.
fn parse_cli_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
