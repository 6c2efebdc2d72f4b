//! Client layer: orchestrates signing and transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{
    Credentials, ParameterSet, SendSms, SendSmsResponse, SignatureNonce, SmsProfile, Timestamp,
    ValidationError,
};
use crate::transport::{SignError, SignedRequest};

const DEFAULT_ENDPOINT: &str = "http://dysmsapi.aliyuncs.com/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`DysmsClient`].
///
/// This error preserves:
/// - local validation failures (raised before any network activity),
/// - HTTP-level failures (non-2xx status or transport failures),
/// - API-level failures (a `Code` other than `OK`),
/// - parse failures.
pub enum DysmsError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code without a business error code in the body.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Dysms returned a business error code.
    #[error("API error: {code} {message:?}")]
    Api {
        http_status: u16,
        code: String,
        message: Option<String>,
        request_id: Option<String>,
    },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// The request signature could not be computed.
    #[error("signature error: {0}")]
    Signature(#[source] SignError),

    /// Required request fields are missing or out of bounds.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<SignError> for DysmsError {
    fn from(err: SignError) -> Self {
        match err {
            SignError::Validation(err) => Self::Validation(err),
            err @ SignError::Key => Self::Signature(err),
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [`DysmsClient`].
///
/// Use this when you need to customize the endpoint, timeout, user-agent,
/// region or the per-call phone-number cap.
pub struct DysmsClientBuilder {
    credentials: Credentials,
    endpoint: String,
    timeout: Duration,
    user_agent: Option<String>,
    profile: SmsProfile,
}

impl DysmsClientBuilder {
    /// Create a builder with the default endpoint, a 3 second timeout and the
    /// default profile.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            profile: SmsProfile::default(),
        }
    }

    /// Override the API endpoint. The URL must not carry a query string.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Override the `RegionId` parameter (default `cn-hangzhou`).
    pub fn region_id(mut self, region_id: impl Into<String>) -> Self {
        self.profile = SmsProfile::new(region_id, self.profile.max_phone_numbers());
        self
    }

    /// Override the maximum number of phone numbers per call (default 27).
    pub fn max_phone_numbers(mut self, max: usize) -> Self {
        self.profile = SmsProfile::new(self.profile.region_id(), max);
        self
    }

    /// Build a [`DysmsClient`].
    pub fn build(self) -> Result<DysmsClient, DysmsError> {
        let mut builder = reqwest::Client::builder().timeout(self.timeout);
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| DysmsError::Transport(Box::new(err)))?;

        Ok(DysmsClient {
            credentials: self.credentials,
            endpoint: self.endpoint,
            profile: self.profile,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level Dysms client.
///
/// Every call gets a fresh timestamp and nonce, is signed with HMAC-SHA1 and
/// sent as a GET to `http://dysmsapi.aliyuncs.com/` unless overridden.
pub struct DysmsClient {
    credentials: Credentials,
    endpoint: String,
    profile: SmsProfile,
    http: Arc<dyn HttpTransport>,
}

impl DysmsClient {
    /// Create a client using the default endpoint, timeout and profile.
    ///
    /// Same as `DysmsClient::builder(credentials).build()`; use
    /// [`DysmsClient::builder`] for more customization.
    pub fn new(credentials: Credentials) -> Result<Self, DysmsError> {
        DysmsClientBuilder::new(credentials).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> DysmsClientBuilder {
        DysmsClientBuilder::new(credentials)
    }

    pub fn profile(&self) -> &SmsProfile {
        &self.profile
    }

    /// Build the signed request URL for `request` with explicit system
    /// parameters. No network I/O.
    pub fn signed_endpoint(
        &self,
        request: &SendSms,
        timestamp: &Timestamp,
        nonce: &SignatureNonce,
    ) -> Result<SignedRequest, DysmsError> {
        let params = ParameterSet::send_sms(
            &self.profile,
            self.credentials.access_key_id(),
            timestamp,
            nonce,
            request,
        );
        let signed = crate::transport::build_signed_endpoint(
            &params,
            self.credentials.access_key_secret(),
            &self.endpoint,
            self.profile.max_phone_numbers(),
        )?;
        Ok(signed)
    }

    /// Send an SMS through Dysms.
    ///
    /// Errors:
    /// - Returns [`DysmsError::Validation`] for incomplete requests, before any I/O,
    /// - [`DysmsError::Transport`] when the GET itself fails,
    /// - [`DysmsError::Api`] when the body carries a `Code` other than `OK`,
    /// - [`DysmsError::HttpStatus`] for non-2xx responses without such a code,
    /// - [`DysmsError::Parse`] for a 2xx body that is not the expected JSON.
    pub async fn send_sms(&self, request: SendSms) -> Result<SendSmsResponse, DysmsError> {
        let nonce = SignatureNonce::random();
        let signed = self.signed_endpoint(&request, &Timestamp::now(), &nonce)?;

        tracing::debug!(
            action = SmsProfile::ACTION,
            region = self.profile.region_id(),
            phone_count = request.phone_count(),
            nonce = nonce.as_str(),
            "sending dysms request"
        );

        let response = self.http.get(signed.as_str()).await.map_err(|err| {
            tracing::warn!(error = %err, "dysms transport failure");
            DysmsError::Transport(err)
        })?;

        tracing::debug!(status = response.status, "dysms response received");

        let success = (200..=299).contains(&response.status);
        let parsed =
            match crate::transport::decode_send_sms_json_response(response.status, &response.body)
            {
                Ok(parsed) => parsed,
                Err(_) if !success => {
                    return Err(http_status_error(response));
                }
                Err(err) => return Err(DysmsError::Parse(Box::new(err))),
            };

        if parsed.is_api_error() {
            tracing::warn!(
                status = parsed.http_status,
                code = parsed.code.as_deref(),
                request_id = parsed.request_id.as_deref(),
                "dysms api error"
            );
            return Err(DysmsError::Api {
                http_status: parsed.http_status,
                code: parsed.code.unwrap_or_default(),
                message: parsed.message,
                request_id: parsed.request_id,
            });
        }

        if !success {
            return Err(http_status_error(response));
        }

        Ok(parsed)
    }
}

fn http_status_error(response: HttpResponse) -> DysmsError {
    let body = if response.body.trim().is_empty() {
        None
    } else {
        Some(response.body)
    };
    DysmsError::HttpStatus {
        status: response.status,
        body,
    }
}
