//! Transport layer: request signing and wire-format details (serialization/deserialization).

mod send_sms;
mod signature;

pub use send_sms::decode_send_sms_json_response;
pub use signature::{
    SignError, SignedRequest, build_signed_endpoint, canonical_query_string, percent_encode,
    sign, string_to_sign,
};
