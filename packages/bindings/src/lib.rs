use std::str::FromStr;

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use installment_core::{PlanInput, PlanSet, PlanSetRecord};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn load_plan_set(record_json: &str) -> NapiResult<PlanSet> {
    let record: PlanSetRecord = serde_json::from_str(record_json).map_err(to_napi_error)?;
    Ok(PlanSet::from_record(&record))
}

fn store_plan_set(set: &PlanSet) -> NapiResult<String> {
    serde_json::to_string(&set.to_record()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Single plan
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_installment(input_json: String) -> NapiResult<String> {
    let input: installment_core::FinancingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = installment_core::compute_with_metadata(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Plan sets
// ---------------------------------------------------------------------------

#[napi]
pub fn recalculate_plan_set(record_json: String) -> NapiResult<String> {
    store_plan_set(&load_plan_set(&record_json)?)
}

/// `price` travels as a string so no precision is lost in a JS number.
#[napi]
pub fn set_cash_price(record_json: String, price: String) -> NapiResult<String> {
    let mut set = load_plan_set(&record_json)?;
    let price = Decimal::from_str(price.trim()).map_err(to_napi_error)?;
    set.set_cash_price(price);
    store_plan_set(&set)
}

#[napi]
pub fn update_plan_field(
    record_json: String,
    index: u32,
    field: String,
    value_json: String,
) -> NapiResult<String> {
    let mut set = load_plan_set(&record_json)?;
    let value: serde_json::Value = serde_json::from_str(&value_json).map_err(to_napi_error)?;
    set.update_plan_field_raw(index as usize, &field, &value)
        .map_err(to_napi_error)?;
    store_plan_set(&set)
}

#[napi]
pub fn add_plan(record_json: String, plan_json: Option<String>) -> NapiResult<String> {
    let mut set = load_plan_set(&record_json)?;
    let plan = match plan_json {
        Some(json) => serde_json::from_str::<PlanInput>(&json).map_err(to_napi_error)?,
        None => PlanInput::default(),
    };
    set.add_plan(plan);
    store_plan_set(&set)
}

#[napi]
pub fn remove_plan(record_json: String, index: u32) -> NapiResult<String> {
    let mut set = load_plan_set(&record_json)?;
    set.remove_plan(index as usize).map_err(to_napi_error)?;
    store_plan_set(&set)
}

#[napi]
pub fn compare_plans(record_json: String) -> NapiResult<String> {
    let set = load_plan_set(&record_json)?;
    let comparison = installment_core::compare_plans(&set).map_err(to_napi_error)?;
    serde_json::to_string(&comparison).map_err(to_napi_error)
}
