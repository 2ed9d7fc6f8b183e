use serde_json::Value;

use crate::upstream::EmailRequest;

pub const INVALID_EMAIL_REQUEST: &str = "Invalid or missing input fields.";

/// Strip everything except word characters, whitespace and `@ . + -`.
pub fn sanitize_field(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| {
            c.is_ascii_alphanumeric()
                || c.is_whitespace()
                || matches!(c, '_' | '@' | '.' | '+' | '-')
        })
        .collect()
}

/// Validate a raw JSON body and build the sanitized upstream request.
pub fn parse_email_request(body: &Value) -> Result<EmailRequest, &'static str> {
    let text = |field: &str| -> Result<String, &'static str> {
        match body.get(field).and_then(Value::as_str) {
            Some(value) if !value.trim().is_empty() => Ok(sanitize_field(value)),
            _ => Err(INVALID_EMAIL_REQUEST),
        }
    };

    let worksheet_id = match body.get("worksheet_id") {
        Some(Value::Number(id)) if id.as_f64() != Some(0.0) => id.clone(),
        _ => return Err(INVALID_EMAIL_REQUEST),
    };

    Ok(EmailRequest {
        name: text("name")?,
        email: text("email")?,
        mobile: text("mobile")?,
        worksheet_id,
        subject: text("subject")?,
        subtopic: text("subtopic")?,
    })
}
