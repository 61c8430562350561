//! Installment financing: the calculator, the interest models it branches
//! on, and the plan set that keeps every plan consistent with its inputs.

pub mod calculator;
pub mod comparison;
pub mod model;
pub mod plan_set;
