//! Interest / markup models offered on a payment plan.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InstallmentError;

/// How the markup on a financed amount is derived.
///
/// Hosts send the model as a free-form string (`interestType`); it is
/// parsed leniently and always emitted under its canonical name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum InterestModel {
    /// Markup is a fixed percentage of the financed amount per year.
    #[default]
    FlatRate,
    /// Markup follows standard loan amortization on the outstanding balance.
    ReducingBalance,
    /// Profit amount is fixed upfront; the rate is informational.
    IslamicProfitBased,
}

impl InterestModel {
    pub const ALL: [InterestModel; 3] = [
        InterestModel::FlatRate,
        InterestModel::ReducingBalance,
        InterestModel::IslamicProfitBased,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterestModel::FlatRate => "FlatRate",
            InterestModel::ReducingBalance => "ReducingBalance",
            InterestModel::IslamicProfitBased => "IslamicProfitBased",
        }
    }

    /// True when the markup amount is an input and the rate is derived.
    pub fn is_profit_based(&self) -> bool {
        matches!(self, InterestModel::IslamicProfitBased)
    }
}

impl fmt::Display for InterestModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterestModel {
    type Err = InstallmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "flat" | "flatrate" => Ok(InterestModel::FlatRate),
            "reducing" | "reducingbalance" | "amortized" => Ok(InterestModel::ReducingBalance),
            "islamic" | "islamicprofitbased" | "profitbased" | "shariah" => {
                Ok(InterestModel::IslamicProfitBased)
            }
            _ => Err(InstallmentError::UnknownInterestModel(s.to_string())),
        }
    }
}

impl TryFrom<String> for InterestModel {
    type Error = InstallmentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InterestModel> for String {
    fn from(model: InterestModel) -> Self {
        model.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_spellings() {
        assert_eq!("flat".parse::<InterestModel>().unwrap(), InterestModel::FlatRate);
        assert_eq!(
            "Reducing Balance".parse::<InterestModel>().unwrap(),
            InterestModel::ReducingBalance
        );
        assert_eq!(
            "islamic_profit_based".parse::<InterestModel>().unwrap(),
            InterestModel::IslamicProfitBased
        );
        assert_eq!(
            "SHARIAH".parse::<InterestModel>().unwrap(),
            InterestModel::IslamicProfitBased
        );
    }

    #[test]
    fn test_canonical_names_round_trip() {
        for model in InterestModel::ALL {
            assert_eq!(model.as_str().parse::<InterestModel>().unwrap(), model);
        }
    }

    #[test]
    fn test_unknown_model_rejected() {
        let err = "balloon".parse::<InterestModel>().unwrap_err();
        assert!(matches!(err, InstallmentError::UnknownInterestModel(ref s) if s == "balloon"));
    }

    #[test]
    fn test_serde_uses_canonical_name() {
        let json = serde_json::to_string(&InterestModel::ReducingBalance).unwrap();
        assert_eq!(json, "\"ReducingBalance\"");
        let parsed: InterestModel = serde_json::from_str("\"profit-based\"").unwrap();
        assert_eq!(parsed, InterestModel::IslamicProfitBased);
    }

    #[test]
    fn test_default_is_flat_rate() {
        assert_eq!(InterestModel::default(), InterestModel::FlatRate);
    }
}
