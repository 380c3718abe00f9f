//! Validation of incoming task payloads.
//!
//! A payload is the raw JSON object a client sent for a create or update.
//! [`parse_task_fields`] checks it and, when it passes, hands back the typed
//! fields so callers never have to re-read the JSON.

use serde_json::{Map, Value};

use super::{Category, Priority, TaskStatus};

/// Fields every create/update payload must carry, in reporting order.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "title",
    "description",
    "priority",
    "effort_hours",
    "status",
    "assigned_to",
];

const TEXT_FIELDS: [&str; 3] = ["title", "description", "assigned_to"];

/// Typed view of a payload that passed validation.
///
/// Optional fields use a double `Option`: the outer one records whether the
/// payload mentioned the field at all, the inner one is its value (`None` for
/// an explicit `null`).
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub effort_hours: f64,
    pub status: TaskStatus,
    pub assigned_to: String,
    pub category: Option<Option<Category>>,
    pub risk_analysis: Option<Option<String>>,
    pub risk_mitigation: Option<Option<String>>,
}

/// Check a payload and return every human-readable violation.
///
/// An empty list means the payload is valid.
pub fn validate(payload: &Map<String, Value>) -> Vec<String> {
    parse_task_fields(payload).err().unwrap_or_default()
}

/// Validate a payload and extract its typed fields.
///
/// Missing required fields are reported alone; content checks only run once
/// every required field is present.
pub fn parse_task_fields(payload: &Map<String, Value>) -> Result<TaskFields, Vec<String>> {
    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| is_absent(payload, field))
        .map(|field| format!("El campo '{}' es obligatorio.", field))
        .collect();
    if !missing.is_empty() {
        return Err(missing);
    }

    let mut errors = Vec::new();

    let priority = payload
        .get("priority")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Priority>().ok());
    if priority.is_none() {
        errors.push(format!(
            "Prioridad inválida. Valores permitidos: {}",
            joined(Priority::ALL.iter().map(Priority::as_str))
        ));
    }

    let status = payload
        .get("status")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<TaskStatus>().ok());
    if status.is_none() {
        errors.push(format!(
            "Estado inválido. Valores permitidos: {}",
            joined(TaskStatus::ALL.iter().map(TaskStatus::as_str))
        ));
    }

    let effort_hours = match payload.get("effort_hours").and_then(parse_number) {
        Some(effort) if effort < 0.0 => {
            errors.push("effort_hours debe ser un número positivo.".to_string());
            None
        }
        Some(effort) => Some(effort),
        None => {
            errors.push("effort_hours debe ser un número válido.".to_string());
            None
        }
    };

    for field in TEXT_FIELDS {
        if !payload.get(field).is_some_and(Value::is_string) {
            errors.push(format!("El campo '{}' debe ser texto.", field));
        }
    }

    let category = match payload.get("category") {
        None => None,
        Some(Value::Null) => Some(None),
        Some(value) => match value.as_str().and_then(|s| s.parse::<Category>().ok()) {
            Some(category) => Some(Some(category)),
            None => {
                errors.push(format!(
                    "Categoría inválida. Valores permitidos: {}",
                    joined(Category::ALL.iter().map(Category::as_str))
                ));
                None
            }
        },
    };

    let risk_analysis = optional_text(payload, "risk_analysis", &mut errors);
    let risk_mitigation = optional_text(payload, "risk_mitigation", &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    match (priority, status, effort_hours) {
        (Some(priority), Some(status), Some(effort_hours)) => Ok(TaskFields {
            title: text(payload, "title"),
            description: text(payload, "description"),
            priority,
            effort_hours,
            status,
            assigned_to: text(payload, "assigned_to"),
            category,
            risk_analysis,
            risk_mitigation,
        }),
        // Every None above pushed an error, so this arm is never reached.
        _ => Err(errors),
    }
}

/// A field counts as absent when it is missing or explicitly `null`.
pub fn is_absent(payload: &Map<String, Value>, field: &str) -> bool {
    payload.get(field).is_none_or(Value::is_null)
}

/// Interpret a JSON value as a finite number.
///
/// Numeric strings such as `"2.5"` are accepted, as clients commonly send
/// form values as text.
pub fn parse_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn optional_text(
    payload: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<String>,
) -> Option<Option<String>> {
    match payload.get(field) {
        None => None,
        Some(Value::Null) => Some(None),
        Some(Value::String(s)) => Some(Some(s.clone())),
        Some(_) => {
            errors.push(format!("El campo '{}' debe ser texto.", field));
            None
        }
    }
}

fn text(payload: &Map<String, Value>, field: &str) -> String {
    payload
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn joined<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(", ")
}
