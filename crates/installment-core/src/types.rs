use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as percentages (12 = 12%), the convention of the
/// hosting form layer. Never as fractions.
pub type Percent = Decimal;

/// Decimal places kept on every monetary and percentage output.
pub const OUTPUT_DP: u32 = 2;

/// Round half away from zero to two decimal places.
pub fn round_output(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(OUTPUT_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_output_half_away_from_zero() {
        assert_eq!(round_output(dec!(7466.665)), dec!(7466.67));
        assert_eq!(round_output(dec!(0.125)), dec!(0.13));
        assert_eq!(round_output(dec!(-0.125)), dec!(-0.13));
        // Banker's rounding would give 2.34 here
        assert_eq!(round_output(dec!(2.345)), dec!(2.35));
    }

    #[test]
    fn test_with_metadata_envelope() {
        let out = with_metadata("test", &"assumption", vec!["w".into()], 7, dec!(1));
        assert_eq!(out.result, dec!(1));
        assert_eq!(out.metadata.computation_time_us, 7);
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
        assert_eq!(out.warnings, vec!["w".to_string()]);
    }
}
