pub mod compute;
pub mod plans;
