use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Alibaba Cloud access key id.
///
/// Emptiness is not checked here: an empty id is reported by
/// [`validate`](crate::domain::validate) as `AccessKeyIdRequired`, in order
/// with the other required fields.
pub struct AccessKeyId(String);

impl AccessKeyId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq)]
/// Alibaba Cloud access key secret, used only as HMAC key material.
///
/// `Debug` output is redacted.
pub struct AccessKeySecret(String);

impl AccessKeySecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw secret.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessKeySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessKeySecret(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Access key pair identifying the caller.
///
/// The id placed into every request's parameter bag is taken from here, so the
/// client-level id and the per-request id are always the same value.
pub struct Credentials {
    access_key_id: AccessKeyId,
    access_key_secret: AccessKeySecret,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            access_key_id: AccessKeyId::new(access_key_id),
            access_key_secret: AccessKeySecret::new(access_key_secret),
        }
    }

    pub fn access_key_id(&self) -> &AccessKeyId {
        &self.access_key_id
    }

    pub fn access_key_secret(&self) -> &AccessKeySecret {
        &self.access_key_secret
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Request timestamp in UTC, formatted as `YYYY-MM-DDTHH:MM:SSZ`.
pub struct Timestamp(String);

impl Timestamp {
    const FORMAT: &'static str = "%Y-%m-%dT%H:%M:%SZ";

    /// Current UTC time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(value: DateTime<Utc>) -> Self {
        Self(value.format(Self::FORMAT).to_string())
    }

    /// Use a pre-formatted value as-is (no format validation is performed).
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Single-use random token guarding against request replay.
pub struct SignatureNonce(String);

impl SignatureNonce {
    /// A fresh UUID v4 in hyphenated lowercase form.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn timestamp_uses_rfc3339_utc_seconds() {
        let at = Utc.with_ymd_and_hms(2017, 7, 12, 2, 42, 19).unwrap();
        assert_eq!(
            Timestamp::from_datetime(at).as_str(),
            "2017-07-12T02:42:19Z"
        );
    }

    #[test]
    fn timestamp_now_has_expected_shape() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_str().len(), "2017-07-12T02:42:19Z".len());
        assert!(ts.as_str().ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(ts.as_str()).is_ok());
    }

    #[test]
    fn nonces_are_fresh_uuids() {
        let a = SignatureNonce::random();
        let b = SignatureNonce::random();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn secret_is_redacted_in_debug() {
        let creds = Credentials::new("testId", "testSecret");
        let debug = format!("{creds:?}");
        assert!(debug.contains("testId"));
        assert!(!debug.contains("testSecret"));
    }
}
