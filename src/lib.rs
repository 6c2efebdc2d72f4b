//! Typed Rust client for the Alibaba Cloud SMS (Dysms) HTTP API.
//!
//! The crate is split into a domain layer of strong types and validation, a
//! transport layer for wire-format quirks (canonical query string, HMAC-SHA1
//! request signing, JSON decoding), and a small client layer orchestrating
//! requests.
//!
//! ```rust,no_run
//! use dysms::{Credentials, DysmsClient, SendSms};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dysms::DysmsError> {
//!     let client = DysmsClient::new(Credentials::new("access-key-id", "access-key-secret"))?;
//!     let request = SendSms::new(
//!         "15300000001",
//!         "阿里云短信测试专用",
//!         "SMS_71390007",
//!         r#"{"code":"123456"}"#,
//!     );
//!     let resp = client.send_sms(request).await?;
//!     println!("{:?}", resp.request_id);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{DysmsClient, DysmsClientBuilder, DysmsError};
pub use domain::{
    AccessKeyId, AccessKeySecret, Credentials, ParameterSet, SEND_SMS_MAX_PHONE_NUMBERS,
    SendSms, SendSmsResponse, SignatureNonce, SmsProfile, Timestamp, ValidationError, validate,
};
pub use transport::{
    SignError, SignedRequest, build_signed_endpoint, canonical_query_string, percent_encode,
    sign, string_to_sign,
};
