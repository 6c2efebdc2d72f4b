use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::value::{AccessKeyId, SignatureNonce, Timestamp};

/// Maximum number of comma-separated phone numbers per `SendSms` call.
pub const SEND_SMS_MAX_PHONE_NUMBERS: usize = 27;

/// Region used when the client does not override it.
pub const DEFAULT_REGION_ID: &str = "cn-hangzhou";

/// Query parameter names understood by the Dysms API.
pub mod field {
    pub const ACCESS_KEY_ID: &str = "AccessKeyId";
    pub const TIMESTAMP: &str = "Timestamp";
    pub const FORMAT: &str = "Format";
    pub const SIGNATURE_METHOD: &str = "SignatureMethod";
    pub const SIGNATURE_VERSION: &str = "SignatureVersion";
    pub const SIGNATURE_NONCE: &str = "SignatureNonce";
    pub const SIGNATURE: &str = "Signature";
    pub const ACTION: &str = "Action";
    pub const VERSION: &str = "Version";
    pub const REGION_ID: &str = "RegionId";
    pub const PHONE_NUMBERS: &str = "PhoneNumbers";
    pub const SIGN_NAME: &str = "SignName";
    pub const TEMPLATE_CODE: &str = "TemplateCode";
    pub const TEMPLATE_PARAM: &str = "TemplateParam";
    pub const OUT_ID: &str = "OutId";
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Per-client request defaults.
///
/// Action, format, API version and signature method are fixed for the send
/// flow; only the region and the phone-number cap can be changed.
pub struct SmsProfile {
    region_id: String,
    max_phone_numbers: usize,
}

impl SmsProfile {
    pub const ACTION: &'static str = "SendSms";
    pub const FORMAT: &'static str = "JSON";
    pub const VERSION: &'static str = "2017-05-25";
    pub const SIGNATURE_METHOD: &'static str = "HMAC-SHA1";
    pub const SIGNATURE_VERSION: &'static str = "1.0";

    pub fn new(region_id: impl Into<String>, max_phone_numbers: usize) -> Self {
        Self {
            region_id: region_id.into(),
            max_phone_numbers,
        }
    }

    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    pub fn max_phone_numbers(&self) -> usize {
        self.max_phone_numbers
    }
}

impl Default for SmsProfile {
    fn default() -> Self {
        Self::new(DEFAULT_REGION_ID, SEND_SMS_MAX_PHONE_NUMBERS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Business parameters of a single `SendSms` call.
///
/// Values are kept as given; completeness is checked when the request is
/// signed so that errors are reported in a stable order.
pub struct SendSms {
    phone_numbers: String,
    sign_name: String,
    template_code: String,
    template_param: String,
    out_id: Option<String>,
}

impl SendSms {
    /// `phone_numbers` is a comma-separated list, `template_param` a JSON
    /// object with the template variables.
    pub fn new(
        phone_numbers: impl Into<String>,
        sign_name: impl Into<String>,
        template_code: impl Into<String>,
        template_param: impl Into<String>,
    ) -> Self {
        Self {
            phone_numbers: phone_numbers.into(),
            sign_name: sign_name.into(),
            template_code: template_code.into(),
            template_param: template_param.into(),
            out_id: None,
        }
    }

    /// Same as [`SendSms::new`], joining the recipients with commas.
    pub fn to_many<I, S>(
        phone_numbers: I,
        sign_name: impl Into<String>,
        template_code: impl Into<String>,
        template_param: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = phone_numbers
            .into_iter()
            .map(|phone| phone.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(",");
        Self::new(joined, sign_name, template_code, template_param)
    }

    /// Replace the template parameter with the JSON encoding of `params`.
    pub fn with_template_params<T: Serialize + ?Sized>(
        mut self,
        params: &T,
    ) -> Result<Self, serde_json::Error> {
        self.template_param = serde_json::to_string(params)?;
        Ok(self)
    }

    /// Attach a caller-defined id echoed back in delivery receipts.
    pub fn with_out_id(mut self, out_id: impl Into<String>) -> Self {
        self.out_id = Some(out_id.into());
        self
    }

    pub fn phone_numbers(&self) -> &str {
        &self.phone_numbers
    }

    /// Number of comma-separated entries; `0` when the field is empty.
    pub fn phone_count(&self) -> usize {
        if self.phone_numbers.is_empty() {
            0
        } else {
            self.phone_numbers.split(',').count()
        }
    }

    pub fn sign_name(&self) -> &str {
        &self.sign_name
    }

    pub fn template_code(&self) -> &str {
        &self.template_code
    }

    pub fn template_param(&self) -> &str {
        &self.template_param
    }

    pub fn out_id(&self) -> Option<&str> {
        self.out_id.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Request parameters keyed by name, iterated in byte-wise key order.
pub struct ParameterSet(BTreeMap<String, String>);

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble every system and business parameter of a `SendSms` call.
    pub fn send_sms(
        profile: &SmsProfile,
        access_key_id: &AccessKeyId,
        timestamp: &Timestamp,
        nonce: &SignatureNonce,
        request: &SendSms,
    ) -> Self {
        let mut params = Self::new();
        params.insert(field::ACCESS_KEY_ID, access_key_id.as_str());
        params.insert(field::TIMESTAMP, timestamp.as_str());
        params.insert(field::FORMAT, SmsProfile::FORMAT);
        params.insert(field::SIGNATURE_METHOD, SmsProfile::SIGNATURE_METHOD);
        params.insert(field::SIGNATURE_VERSION, SmsProfile::SIGNATURE_VERSION);
        params.insert(field::SIGNATURE_NONCE, nonce.as_str());
        params.insert(field::ACTION, SmsProfile::ACTION);
        params.insert(field::VERSION, SmsProfile::VERSION);
        params.insert(field::REGION_ID, profile.region_id());
        params.insert(field::PHONE_NUMBERS, request.phone_numbers());
        params.insert(field::SIGN_NAME, request.sign_name());
        params.insert(field::TEMPLATE_CODE, request.template_code());
        params.insert(field::TEMPLATE_PARAM, request.template_param());
        if let Some(out_id) = request.out_id() {
            params.insert(field::OUT_ID, out_id);
        }
        params
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub(crate) fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
