use serde::Deserialize;

use crate::domain::SendSmsResponse;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SendSmsJsonResponse {
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    biz_id: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

pub fn decode_send_sms_json_response(
    http_status: u16,
    json: &str,
) -> Result<SendSmsResponse, TransportError> {
    let parsed: SendSmsJsonResponse = serde_json::from_str(json)?;

    Ok(SendSmsResponse {
        http_status,
        request_id: parsed.request_id,
        message: parsed.message,
        biz_id: parsed.biz_id,
        code: parsed.code,
    })
}
