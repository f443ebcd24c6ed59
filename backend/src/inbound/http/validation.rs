//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure becomes an `invalid_request` error whose details
//! name the offending field, a stable code, and (when useful) the rejected
//! value.

use serde_json::json;

use crate::domain::{
    Error, PortfolioValidationError, PostValidationError, ProfileValidationError, UserId,
    UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    TooShort,
    TooLong,
    InvalidCharacters,
    InvalidUrl,
    InvalidYear,
    TooManyItems,
    InvalidDateRange,
    InvalidValue,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::InvalidCharacters => "invalid_characters",
            Self::InvalidUrl => "invalid_url",
            Self::InvalidYear => "invalid_year",
            Self::TooManyItems => "too_many_items",
            Self::InvalidDateRange => "invalid_date_range",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }

    fn with_index(self, code: ErrorCode, index: usize, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    ValidationError::new(field, format!("missing required field: {}", field.as_str()))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    ValidationError::new(field, format!("{} must be a valid UUID", field.as_str()))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn invalid_value_error(field: FieldName, message: impl Into<String>, value: &str) -> Error {
    ValidationError::new(field, message).with_value(ErrorCode::InvalidValue, value)
}

/// Parse an identifier with its domain constructor, reporting the raw value
/// on failure.
pub(crate) fn parse_id<'a, T, E>(
    raw: &'a str,
    field: FieldName,
    parse: impl FnOnce(&'a str) -> Result<T, E>,
) -> Result<T, Error> {
    parse(raw).map_err(|_| invalid_uuid_error(field, raw))
}

/// Parse a list of user ids, reporting the index of the first bad entry.
pub(crate) fn parse_user_id_list(values: &[String], field: FieldName) -> Result<Vec<UserId>, Error> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            UserId::new(value).map_err(|_| {
                ValidationError::new(field, format!("{} must contain valid UUIDs", field.as_str()))
                    .with_index(ErrorCode::InvalidUuid, index, value.as_str())
            })
        })
        .collect()
}

/// Map account field failures onto the request field that carried them.
pub(crate) fn user_validation_error(error: &UserValidationError, field: FieldName) -> Error {
    let code = match error {
        UserValidationError::EmptyId | UserValidationError::InvalidId => ErrorCode::InvalidUuid,
        UserValidationError::UsernameTooShort { .. } => ErrorCode::TooShort,
        UserValidationError::UsernameTooLong { .. } => ErrorCode::TooLong,
        UserValidationError::UsernameInvalidCharacters => ErrorCode::InvalidCharacters,
        UserValidationError::EmptyFullName => ErrorCode::MissingField,
    };
    ValidationError::new(field, error.to_string()).with_code(code)
}

pub(crate) fn post_validation_error(error: &PostValidationError) -> Error {
    let message = error.to_string();
    match error {
        PostValidationError::InvalidId => {
            ValidationError::new(FieldName::new("id"), message).with_code(ErrorCode::InvalidUuid)
        }
        PostValidationError::EmptyText => ValidationError::new(FieldName::new("text"), message)
            .with_code(ErrorCode::MissingField),
        PostValidationError::TextTooLong { .. } => {
            ValidationError::new(FieldName::new("text"), message).with_code(ErrorCode::TooLong)
        }
        PostValidationError::TooManyImages { .. } => {
            ValidationError::new(FieldName::new("images"), message)
                .with_code(ErrorCode::TooManyItems)
        }
        PostValidationError::InvalidImage { index } => Error::invalid_request(message)
            .with_details(json!({
                "field": "images",
                "index": index,
                "code": ErrorCode::InvalidUrl.as_str(),
            })),
    }
}

pub(crate) fn profile_validation_error(error: &ProfileValidationError) -> Error {
    let message = error.to_string();
    match error {
        ProfileValidationError::InvalidWebsite => {
            ValidationError::new(FieldName::new("website"), message)
                .with_code(ErrorCode::InvalidUrl)
        }
        ProfileValidationError::DescriptionTooLong { .. } => {
            ValidationError::new(FieldName::new("description"), message)
                .with_code(ErrorCode::TooLong)
        }
    }
}

pub(crate) fn portfolio_validation_error(error: &PortfolioValidationError) -> Error {
    let message = error.to_string();
    let (field, code) = match error {
        PortfolioValidationError::Required { field } => (*field, ErrorCode::MissingField),
        PortfolioValidationError::InvalidUrl { field } => (*field, ErrorCode::InvalidUrl),
        PortfolioValidationError::InvalidYear { field } => (*field, ErrorCode::InvalidYear),
        PortfolioValidationError::InvalidId { field } => (*field, ErrorCode::InvalidUuid),
        PortfolioValidationError::PartialEndDate => ("endYear", ErrorCode::MissingField),
        PortfolioValidationError::EndBeforeStart => ("endYear", ErrorCode::InvalidDateRange),
    };
    ValidationError::new(FieldName::new(field), message).with_code(code)
}

#[cfg(test)]
mod tests {
    //! Detail payload coverage for validation mappers.
    use super::*;
    use rstest::rstest;
    use serde_json::Value;

    use crate::domain::ErrorCode as DomainCode;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a Value> {
        error.details().and_then(|details| details.get(key))
    }

    #[rstest]
    #[case(UserValidationError::UsernameTooShort { min: 3 }, "too_short")]
    #[case(UserValidationError::UsernameTooLong { max: 20 }, "too_long")]
    #[case(UserValidationError::UsernameInvalidCharacters, "invalid_characters")]
    fn username_failures_carry_stable_codes(
        #[case] error: UserValidationError,
        #[case] code: &str,
    ) {
        let mapped = user_validation_error(&error, FieldName::new("username"));
        assert_eq!(mapped.code(), DomainCode::InvalidRequest);
        assert_eq!(mapped.message(), error.to_string());
        assert_eq!(detail(&mapped, "field"), Some(&Value::from("username")));
        assert_eq!(detail(&mapped, "code"), Some(&Value::from(code)));
    }

    #[rstest]
    fn image_failures_report_the_index() {
        let mapped = post_validation_error(&PostValidationError::InvalidImage { index: 2 });
        assert_eq!(detail(&mapped, "field"), Some(&Value::from("images")));
        assert_eq!(detail(&mapped, "index"), Some(&Value::from(2)));
    }

    #[rstest]
    fn portfolio_failures_name_the_form_field() {
        let mapped = portfolio_validation_error(&PortfolioValidationError::InvalidYear {
            field: "startYear",
        });
        assert_eq!(detail(&mapped, "field"), Some(&Value::from("startYear")));
        assert_eq!(detail(&mapped, "code"), Some(&Value::from("invalid_year")));
    }

    #[rstest]
    fn bad_ids_in_a_list_report_position_and_value() {
        let values = vec![UserId::random().to_string(), "nope".to_owned()];
        let error = parse_user_id_list(&values, FieldName::new("userIds"))
            .expect_err("second id is invalid");
        assert_eq!(detail(&error, "index"), Some(&Value::from(1)));
        assert_eq!(detail(&error, "value"), Some(&Value::from("nope")));
    }

    #[rstest]
    fn parse_id_echoes_the_raw_value() {
        let error = parse_id("xyz", FieldName::new("id"), UserId::new).expect_err("invalid");
        assert_eq!(detail(&error, "code"), Some(&Value::from("invalid_uuid")));
        assert_eq!(detail(&error, "value"), Some(&Value::from("xyz")));
    }
}
