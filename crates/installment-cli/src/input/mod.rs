pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a typed input from `--input <file>` or, failing that, piped stdin.
pub fn read_input<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        file::read_structured(path)
    } else if let Some(text) = stdin::read_stdin()? {
        parse_piped(&text)
    } else {
        Err(format!("--input <file.json|file.yaml> or stdin required for {what}").into())
    }
}

/// Parse piped text, which carries no extension: JSON first, then YAML.
pub fn parse_piped<T: DeserializeOwned>(text: &str) -> Result<T, Box<dyn std::error::Error>> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(json_err) => serde_yaml::from_str(text).map_err(|yaml_err| {
            format!("stdin is neither valid JSON ({json_err}) nor YAML ({yaml_err})").into()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use installment_core::PlanSetRecord;
    use rust_decimal_macros::dec;

    #[test]
    fn test_piped_json() {
        let record: PlanSetRecord =
            parse_piped(r#"{"cashPrice": "1000", "plans": [{"tenureMonths": 6}]}"#).unwrap();
        assert_eq!(record.cash_price, dec!(1000));
        assert_eq!(record.plans[0].tenure_months, 6);
    }

    #[test]
    fn test_piped_yaml() {
        let text = "cashPrice: 100000\nplans:\n  - downPayment: 20000\n    interestType: reducing\n    interestRatePercent: 12\n";
        let record: PlanSetRecord = parse_piped(text).unwrap();
        assert_eq!(record.cash_price, dec!(100000));
        assert_eq!(record.plans[0].down_payment, dec!(20000));
        assert_eq!(
            record.plans[0].interest_model,
            installment_core::InterestModel::ReducingBalance
        );
    }

    #[test]
    fn test_piped_garbage_reports_both_parsers() {
        let err = parse_piped::<PlanSetRecord>("cashPrice: [").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("JSON") && msg.contains("YAML"), "{msg}");
    }
}
