pub mod error;
pub mod financing;
pub mod time_value;
pub mod types;

pub use error::InstallmentError;
pub use financing::comparison::{compare_plans, PlanComparison};
pub use financing::calculator::{compute, compute_with_metadata, FinancingInput, FinancingOutput};
pub use financing::model::InterestModel;
pub use financing::plan_set::{Plan, PlanField, PlanInput, PlanRecord, PlanSet, PlanSetRecord};
pub use types::*;

/// Standard result type for all installment operations
pub type InstallmentResult<T> = Result<T, InstallmentError>;
