use std::fmt;

use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use url::form_urlencoded;

use crate::domain::{AccessKeySecret, ParameterSet, ValidationError, field, validate};

const HTTP_METHOD: &str = "GET";

#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid HMAC key length")]
    Key,
}

/// A fully formed request URL: `base?Signature=...&<canonical query>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    url: String,
    signature: String,
    canonical_query: String,
}

impl SignedRequest {
    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn into_string(self) -> String {
        self.url
    }

    /// Percent-encoded signature as it appears in the URL.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn canonical_query(&self) -> &str {
        &self.canonical_query
    }
}

impl fmt::Display for SignedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Form-encode `value`, then rewrite `+` to `%20`, `*` to `%2A` and `%7E` back
/// to `~`. The server recomputes the signature over exactly this encoding.
pub fn percent_encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
        .replace('*', "%2A")
        .replace("%7E", "~")
}

/// Encoded `key=value` pairs in key order joined by `&`, with no leading `&`.
///
/// A `Signature` entry is never part of the signed material and is skipped.
pub fn canonical_query_string(params: &ParameterSet) -> String {
    params
        .iter()
        .filter(|(key, _)| *key != field::SIGNATURE)
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn string_to_sign(canonical_query: &str) -> String {
    format!(
        "{HTTP_METHOD}&{}&{}",
        percent_encode("/"),
        percent_encode(canonical_query)
    )
}

/// Base64 HMAC-SHA1 of `string_to_sign` keyed with `secret&`.
pub fn sign(secret: &AccessKeySecret, string_to_sign: &str) -> Result<String, SignError> {
    let key = format!("{}&", secret.as_str());
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes()).map_err(|_| SignError::Key)?;
    mac.update(string_to_sign.as_bytes());
    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

/// Validate `params`, sign them, and emit the request URL.
///
/// The canonical query string is shared by the string-to-sign and the final
/// URL, so what the server verifies is byte-for-byte what it receives.
pub fn build_signed_endpoint(
    params: &ParameterSet,
    secret: &AccessKeySecret,
    base_url: &str,
    max_phone_numbers: usize,
) -> Result<SignedRequest, SignError> {
    validate(params, max_phone_numbers)?;

    let canonical_query = canonical_query_string(params);
    let signature = percent_encode(&sign(secret, &string_to_sign(&canonical_query))?);
    let url = format!(
        "{base_url}?{}={signature}&{canonical_query}",
        field::SIGNATURE
    );

    Ok(SignedRequest {
        url,
        signature,
        canonical_query,
    })
}

#[cfg(test)]
mod tests {
    use crate::domain::SEND_SMS_MAX_PHONE_NUMBERS;

    use super::*;

    const BASE_URL: &str = "http://dysmsapi.aliyuncs.com/";

    fn secret() -> AccessKeySecret {
        AccessKeySecret::new("testSecret")
    }

    // Parameters of the provider's published signing walkthrough.
    fn reference_params() -> ParameterSet {
        [
            ("AccessKeyId", "testId"),
            ("Action", "SendSms"),
            ("Format", "XML"),
            ("OutId", "123"),
            ("PhoneNumbers", "15300000001"),
            ("RegionId", "cn-hangzhou"),
            ("SignName", "阿里云短信测试专用"),
            ("SignatureMethod", "HMAC-SHA1"),
            ("SignatureNonce", "45e25e9b-0a6f-4070-8c85-2956eda1b466"),
            ("SignatureVersion", "1.0"),
            ("TemplateCode", "SMS_71390007"),
            ("TemplateParam", r#"{"customer":"test"}"#),
            ("Timestamp", "2017-07-12T02:42:19Z"),
            ("Version", "2017-05-25"),
        ]
        .into_iter()
        .collect()
    }

    fn build(params: &ParameterSet) -> Result<SignedRequest, SignError> {
        build_signed_endpoint(params, &secret(), BASE_URL, SEND_SMS_MAX_PHONE_NUMBERS)
    }

    #[test]
    fn percent_encode_applies_provider_substitutions() {
        let encoded = percent_encode("+*%7E");
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('*'));
        assert!(!encoded.contains("%7E"));
        assert_eq!(encoded, "%2B%2A%257E");

        assert_eq!(percent_encode("a b~c*"), "a%20b~c%2A");
        assert_eq!(percent_encode("/"), "%2F");
        assert_eq!(percent_encode("-_.~AZaz09"), "-_.~AZaz09");
        assert_eq!(percent_encode("短"), "%E7%9F%AD");
    }

    #[test]
    fn canonical_query_sorts_keys() {
        let params: ParameterSet = [("Format", "JSON"), ("AccessKeyId", "testId")]
            .into_iter()
            .collect();
        assert_eq!(
            canonical_query_string(&params),
            "AccessKeyId=testId&Format=JSON"
        );
        assert_eq!(
            string_to_sign("AccessKeyId=testId&Format=JSON"),
            "GET&%2F&AccessKeyId%3DtestId%26Format%3DJSON"
        );
        assert_eq!(
            sign(&secret(), "GET&%2F&AccessKeyId%3DtestId%26Format%3DJSON").unwrap(),
            "HlnXPYZ5IF8plXOR6MqbMuCLCws="
        );
    }

    #[test]
    fn reference_walkthrough_signature_matches() {
        let params = reference_params();
        let canonical = canonical_query_string(&params);
        assert!(canonical.starts_with("AccessKeyId=testId&Action=SendSms&Format=XML&OutId=123"));
        assert!(canonical.contains(
            "SignName=%E9%98%BF%E9%87%8C%E4%BA%91%E7%9F%AD%E4%BF%A1%E6%B5%8B%E8%AF%95%E4%B8%93%E7%94%A8"
        ));
        assert!(canonical.contains("TemplateParam=%7B%22customer%22%3A%22test%22%7D"));
        assert!(canonical.ends_with("Timestamp=2017-07-12T02%3A42%3A19Z&Version=2017-05-25"));

        let raw = sign(&secret(), &string_to_sign(&canonical)).unwrap();
        assert_eq!(raw, "zJDF+Lrzhj/ThnlvIToysFRq6t4=");

        let signed = build(&params).unwrap();
        assert_eq!(signed.signature(), "zJDF%2BLrzhj%2FThnlvIToysFRq6t4%3D");
        assert_eq!(
            signed.as_str(),
            format!("{BASE_URL}?Signature=zJDF%2BLrzhj%2FThnlvIToysFRq6t4%3D&{canonical}")
        );
    }

    #[test]
    fn signature_is_deterministic_and_sensitive_to_every_value() {
        let params = reference_params();
        let baseline = build(&params).unwrap();
        assert_eq!(build(&params).unwrap(), baseline);

        for (key, _) in params.iter() {
            let mut changed = params.clone();
            changed.insert(key, "27");
            let other = build(&changed).unwrap();
            assert_ne!(other.signature(), baseline.signature(), "key {key}");
        }

        let other_secret = build_signed_endpoint(
            &params,
            &AccessKeySecret::new("otherSecret"),
            BASE_URL,
            SEND_SMS_MAX_PHONE_NUMBERS,
        )
        .unwrap();
        assert_ne!(other_secret.signature(), baseline.signature());
    }

    #[test]
    fn output_contains_one_signature_and_each_key_once() {
        let params = reference_params();
        let signed = build(&params).unwrap();
        let query = signed.as_str().strip_prefix(BASE_URL).unwrap();
        let query = query.strip_prefix('?').unwrap();
        let keys = query
            .split('&')
            .map(|pair| pair.split_once('=').unwrap().0)
            .collect::<Vec<_>>();

        assert_eq!(signed.as_str().matches("Signature=").count(), 1);
        assert_eq!(keys[0], "Signature");
        assert_eq!(keys.len(), params.len() + 1);
        for (key, _) in params.iter() {
            assert_eq!(keys.iter().filter(|k| **k == key).count(), 1, "key {key}");
        }
    }

    #[test]
    fn validation_failures_stop_signing() {
        let mut params = reference_params();
        params.insert("SignName", "");
        let err = build(&params).unwrap_err();
        assert!(matches!(
            err,
            SignError::Validation(ValidationError::SignNameRequired)
        ));
    }

    #[test]
    fn preset_signature_entry_is_not_signed_or_repeated() {
        let baseline = build(&reference_params()).unwrap();

        let mut params = reference_params();
        params.insert(field::SIGNATURE, "");
        assert_eq!(
            canonical_query_string(&params),
            canonical_query_string(&reference_params())
        );

        let signed = build(&params).unwrap();
        assert_eq!(signed.as_str().matches("Signature=").count(), 1);
        assert_eq!(signed.signature(), baseline.signature());
        assert_eq!(signed, baseline);

        params.insert(field::SIGNATURE, "stale");
        assert_eq!(build(&params).unwrap(), baseline);
    }
}
