use std::fmt;

use crate::domain::request::{ParameterSet, field};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    PhoneNumbersRequired,
    PhoneNumbersTooLong { max: usize, actual: usize },
    AccessKeyIdRequired,
    SignNameRequired,
    TemplateCodeRequired,
    TemplateParamRequired,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PhoneNumbersRequired => write!(f, "PhoneNumbers is required"),
            Self::PhoneNumbersTooLong { max, actual } => {
                write!(f, "PhoneNumbers is too long: {actual} numbers (max {max})")
            }
            Self::AccessKeyIdRequired => write!(f, "AccessKeyId is required"),
            Self::SignNameRequired => write!(f, "SignName is required"),
            Self::TemplateCodeRequired => write!(f, "TemplateCode is required"),
            Self::TemplateParamRequired => write!(f, "TemplateParam is required"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check that a parameter bag is complete enough to be signed.
///
/// Rules are applied in a fixed order and the first violation wins:
/// PhoneNumbers present, PhoneNumbers count, AccessKeyId, SignName,
/// TemplateCode, TemplateParam. A missing key is treated as empty. Values are
/// not inspected beyond emptiness and the comma-separated count.
pub fn validate(params: &ParameterSet, max_phone_numbers: usize) -> Result<(), ValidationError> {
    let phone_numbers = params.get_or_empty(field::PHONE_NUMBERS);
    if phone_numbers.is_empty() {
        return Err(ValidationError::PhoneNumbersRequired);
    }
    let count = phone_numbers.split(',').count();
    if count > max_phone_numbers {
        return Err(ValidationError::PhoneNumbersTooLong {
            max: max_phone_numbers,
            actual: count,
        });
    }
    if params.get_or_empty(field::ACCESS_KEY_ID).is_empty() {
        return Err(ValidationError::AccessKeyIdRequired);
    }
    if params.get_or_empty(field::SIGN_NAME).is_empty() {
        return Err(ValidationError::SignNameRequired);
    }
    if params.get_or_empty(field::TEMPLATE_CODE).is_empty() {
        return Err(ValidationError::TemplateCodeRequired);
    }
    if params.get_or_empty(field::TEMPLATE_PARAM).is_empty() {
        return Err(ValidationError::TemplateParamRequired);
    }
    Ok(())
}
