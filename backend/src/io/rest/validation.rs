//! # Request Validation
//!
//! Turns raw request payloads into typed domain commands, or into an ordered
//! list of field violations. One function per request shape. Validation has
//! no side effects.
//!
//! Payload fields are kept as loose JSON values so that a wrong type is
//! reported as a field violation rather than as a body parse failure.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use shared::FieldViolation;

use crate::domain::commands::cargo_movement::{CargoMovementListQuery, CreateCargoMovementCommand};

/// Raw body of `POST /api/cargo-movement`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoMovementPayload {
    #[serde(default)]
    pub cargo_id: Option<Value>,
    #[serde(default)]
    pub movement_date: Option<Value>,
    #[serde(default)]
    pub from_location: Option<Value>,
    #[serde(default)]
    pub to_location: Option<Value>,
}

/// Raw query of `GET /api/cargo-movement`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoMovementListParams {
    pub cargo_id: Option<String>,
    pub size: Option<String>,
    pub from: Option<String>,
}

const SIZE_FIELD: &str = "size";
const SIZE_NOT_A_NUMBER: &str = "The maximum number of objects that will be returned must be a number";
const SIZE_TOO_SMALL: &str = "The maximum number of objects that will be returned must be at least 1";

const FROM_FIELD: &str = "from";
const FROM_NOT_A_NUMBER: &str = "Number of the element from which sampling will begin must be a number";
const FROM_TOO_SMALL: &str = "Number of the element from which sampling will begin must be at least 0";

/// Collects violations in the order fields are checked
#[derive(Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn check<T>(&mut self, field: &str, result: Result<T, &str>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.0.push(FieldViolation::new(field, message));
                None
            }
        }
    }
}

/// Validate a create payload
pub fn validate_cargo_movement_request(
    payload: &CargoMovementPayload,
) -> Result<CreateCargoMovementCommand, Vec<FieldViolation>> {
    let mut violations = Violations::default();

    let cargo_id = violations.check("cargoId", cargo_id(present(&payload.cargo_id).map(JsonField::Json)));
    let movement_date = violations.check("movementDate", movement_date(present(&payload.movement_date)));
    let from_location = violations.check(
        "fromLocation",
        location(
            present(&payload.from_location),
            "The starting point of the cargo movement is required",
            "The starting point of the cargo movement must be a string",
        ),
    );
    let to_location = violations.check(
        "toLocation",
        location(
            present(&payload.to_location),
            "The destination point of the cargo movement is required",
            "The destination point of the cargo movement must be a string",
        ),
    );

    match (cargo_id, movement_date, from_location, to_location) {
        (Some(cargo_id), Some(movement_date), Some(from_location), Some(to_location)) => {
            Ok(CreateCargoMovementCommand {
                cargo_id,
                movement_date,
                from_location,
                to_location,
            })
        }
        _ => Err(violations.0),
    }
}

/// Validate list query parameters. Absent page values take the query defaults.
pub fn validate_cargo_movement_list_request(
    params: &CargoMovementListParams,
) -> Result<CargoMovementListQuery, Vec<FieldViolation>> {
    let mut violations = Violations::default();

    let cargo_id = violations.check("cargoId", cargo_id(non_empty(&params.cargo_id).map(JsonField::Text)));
    let size = violations.check(
        SIZE_FIELD,
        bounded(non_empty(&params.size), 1, SIZE_NOT_A_NUMBER, SIZE_TOO_SMALL),
    );
    let from = violations.check(
        FROM_FIELD,
        bounded(non_empty(&params.from), 0, FROM_NOT_A_NUMBER, FROM_TOO_SMALL),
    );

    match (cargo_id, size, from) {
        (Some(cargo_id), Some(size), Some(from)) => Ok(CargoMovementListQuery::new(cargo_id, size, from)),
        _ => Err(violations.0),
    }
}

/// Extract the id list of a counts body: `cargosIds` must be an array of
/// strings. Returns `None` when it is missing or has any other shape.
pub fn parse_cargo_ids(body: &Value) -> Option<Vec<String>> {
    body.get("cargosIds")?
        .as_array()?
        .iter()
        .map(|id| id.as_str().map(str::to_owned))
        .collect()
}

enum JsonField<'a> {
    Json(&'a Value),
    Text(&'a str),
}

/// Treats JSON `null` the same as an absent field
fn present(value: &Option<Value>) -> Option<&Value> {
    value.as_ref().filter(|v| !v.is_null())
}

/// Treats an empty query parameter the same as an absent one
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_integer(field: &JsonField) -> Option<i64> {
    match field {
        JsonField::Json(Value::Number(n)) => n.as_i64().or_else(|| whole_number(n.as_f64()?)),
        JsonField::Json(Value::String(s)) => s.trim().parse().ok(),
        JsonField::Json(_) => None,
        JsonField::Text(s) => s.parse().ok(),
    }
}

/// `123.0` is an integer; `1.5` and out-of-range values are not
fn whole_number(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.fract() == 0.0 && in_range).then_some(value as i64)
}

fn cargo_id(field: Option<JsonField>) -> Result<i64, &'static str> {
    let field = field.ok_or("Cargo ID is required")?;
    let id = parse_integer(&field).ok_or("Cargo ID must be a number")?;
    if id <= 0 {
        return Err("Cargo ID must be a positive number");
    }
    Ok(id)
}

fn movement_date(value: Option<&Value>) -> Result<Option<DateTime<Utc>>, &'static str> {
    let Some(value) = value else {
        return Ok(None);
    };
    let raw = value.as_str().ok_or("Movement date must be a string")?;
    parse_date(raw)
        .map(Some)
        .ok_or("Movement date must be an RFC 3339 timestamp or a YYYY-MM-DD date")
}

/// Accepts a full RFC 3339 timestamp or a bare date taken as UTC midnight
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}

fn location(value: Option<&Value>, required: &'static str, not_text: &'static str) -> Result<String, &'static str> {
    let value = value.ok_or(required)?;
    let text = value.as_str().ok_or(not_text)?;
    if text.trim().is_empty() {
        return Err(required);
    }
    Ok(text.to_string())
}

fn bounded(
    value: Option<&str>,
    min: i64,
    not_a_number: &'static str,
    too_small: &'static str,
) -> Result<Option<u32>, &'static str> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let number: i64 = raw.parse().map_err(|_| not_a_number)?;
    if number < min {
        return Err(too_small);
    }
    Ok(Some(u32::try_from(number).unwrap_or(u32::MAX)))
}
