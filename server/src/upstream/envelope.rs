//! The `{"status": "success", "data": [...]}` wrapper used by the PHP API.

use serde_json::Value;
use worksheet_catalog::WorksheetRecord;

/// Unwrap a worksheet list envelope.
pub fn decode_worksheets(body: Value) -> Result<Vec<WorksheetRecord>, String> {
    let Value::Object(mut envelope) = body else {
        return Err("response is not a JSON object".to_string());
    };

    match envelope.get("status").and_then(Value::as_str) {
        Some("success") => {}
        Some(other) => return Err(format!("status is '{}'", other)),
        None => return Err("status field missing".to_string()),
    }

    let data = envelope.remove("data").unwrap_or(Value::Null);
    if !data.is_array() {
        return Err("data is not an array".to_string());
    }

    serde_json::from_value(data).map_err(|err| format!("malformed worksheet record: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_success_envelope() {
        let body = json!({
            "status": "success",
            "data": [
                { "id": 1, "title": "Sums", "description": "", "subject": "Math", "subtopic": "Addition" }
            ]
        });

        let records = decode_worksheets(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Sums");
    }

    #[test]
    fn test_decode_empty_data() {
        let body = json!({ "status": "success", "data": [] });
        assert!(decode_worksheets(body).unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_error_status() {
        let body = json!({ "status": "error", "message": "db down" });
        assert_eq!(decode_worksheets(body).unwrap_err(), "status is 'error'");
    }

    #[test]
    fn test_decode_rejects_non_array_data() {
        let body = json!({ "status": "success", "data": { "id": 1 } });
        assert_eq!(decode_worksheets(body).unwrap_err(), "data is not an array");

        let body = json!({ "status": "success" });
        assert!(decode_worksheets(body).is_err());
    }

    #[test]
    fn test_decode_rejects_malformed_record() {
        let body = json!({ "status": "success", "data": [ { "id": 1, "title": "No subject" } ] });
        let err = decode_worksheets(body).unwrap_err();
        assert!(err.starts_with("malformed worksheet record"));
    }

    #[test]
    fn test_decode_rejects_bare_array() {
        assert!(decode_worksheets(json!([])).is_err());
    }
}
