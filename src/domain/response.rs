/// Outcome envelope of a `SendSms` call.
///
/// Body fields are all optional: a bare `{"Message":"OK","RequestId":"..."}`
/// is a valid success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendSmsResponse {
    pub http_status: u16,
    pub request_id: Option<String>,
    pub message: Option<String>,
    pub biz_id: Option<String>,
    pub code: Option<String>,
}

impl SendSmsResponse {
    /// Business code meaning the message was accepted.
    pub const CODE_OK: &'static str = "OK";

    /// `true` when the API reported a business code other than `OK`.
    pub fn is_api_error(&self) -> bool {
        self.code
            .as_deref()
            .is_some_and(|code| code != Self::CODE_OK)
    }
}
