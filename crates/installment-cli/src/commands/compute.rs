use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use installment_core::financing::calculator::DEFAULT_TENURE_MONTHS;
use installment_core::{compute_with_metadata, FinancingInput, InterestModel};

use crate::input;

/// Arguments for a single plan calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ComputeArgs {
    /// Cash price of the product
    #[arg(long)]
    pub cash_price: Option<Decimal>,

    /// Down payment paid upfront
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Number of monthly installments
    #[arg(long, default_value_t = DEFAULT_TENURE_MONTHS)]
    pub tenure_months: i32,

    /// Interest type: flat, reducing or islamic
    #[arg(long, default_value = "flat")]
    pub interest_type: InterestModel,

    /// Annual interest rate in percent (e.g. 12 for 12%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Fixed profit amount for profit-based plans
    #[arg(long)]
    pub markup: Option<Decimal>,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compute(args: ComputeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let financing_input: FinancingInput = match (args.input.as_deref(), args.cash_price) {
        (Some(path), _) => input::file::read_structured(path)?,
        (None, Some(cash_price)) => FinancingInput {
            cash_price,
            down_payment: args.down_payment.unwrap_or(dec!(0)),
            tenure_months: args.tenure_months,
            interest_model: args.interest_type,
            interest_rate_percent: args.rate.unwrap_or(dec!(0)),
            markup_amount: args.markup.unwrap_or(dec!(0)),
        },
        (None, None) => match input::stdin::read_stdin()? {
            Some(text) => input::parse_piped(&text)?,
            None => {
                return Err(
                    "--cash-price, --input <file.json|file.yaml> or stdin required for installment calculation"
                        .into(),
                )
            }
        },
    };

    let result = compute_with_metadata(&financing_input);
    Ok(serde_json::to_value(result)?)
}
