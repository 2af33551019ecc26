use serde_json::Value;
use tracing::debug;

use crate::error::CycleError;

/// The closed set of review statuses and their canned verdicts. The
/// sentences are user-visible contract text, reproduced verbatim.
fn verdict(status: &str) -> Option<&'static str> {
    match status {
        "approved" => Some("Работа проверена: ревьюеру всё понравилось. Ура!"),
        "reviewing" => Some("Работа взята на проверку ревьюером."),
        "rejected" => Some("Работа проверена: у ревьюера есть замечания."),
        _ => None,
    }
}

/// Type-check the decoded payload and extract the homework list.
///
/// The payload must be a JSON object with a list-valued `homeworks` key;
/// each shape violation gets its own error. An empty list is fine.
pub fn check_response(payload: &Value) -> Result<&[Value], CycleError> {
    let map = payload.as_object().ok_or(CycleError::NotAMapping)?;
    let homeworks = map.get("homeworks").ok_or(CycleError::MissingHomeworks)?;
    let list = homeworks.as_array().ok_or(CycleError::HomeworksNotAList)?;

    if list.is_empty() {
        debug!("no new homeworks in this window");
    }

    Ok(list)
}

/// Render the notification text for one homework record.
///
/// Pure: same record in, same message out. Reports every absent field at
/// once, and refuses statuses outside the verdict table rather than
/// skipping them silently.
pub fn parse_status(homework: &Value) -> Result<String, CycleError> {
    let name = homework.get("homework_name").and_then(Value::as_str);
    let status = homework.get("status").and_then(Value::as_str);

    let (name, status) = match (name, status) {
        (Some(name), Some(status)) => (name, status),
        _ => {
            let mut missing = Vec::new();
            if name.is_none() {
                missing.push("homework_name".to_string());
            }
            if status.is_none() {
                missing.push("status".to_string());
            }
            return Err(CycleError::MissingFields { missing });
        }
    };

    let verdict = verdict(status).ok_or_else(|| CycleError::UnknownStatus {
        name: name.to_string(),
        status: status.to_string(),
    })?;

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name, verdict
    ))
}
