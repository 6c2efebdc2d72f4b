//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    DEFAULT_REGION_ID, ParameterSet, SEND_SMS_MAX_PHONE_NUMBERS, SendSms, SmsProfile, field,
};
pub use response::SendSmsResponse;
pub use validation::{ValidationError, validate};
pub use value::{AccessKeyId, AccessKeySecret, Credentials, SignatureNonce, Timestamp};
