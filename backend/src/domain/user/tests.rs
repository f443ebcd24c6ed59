//! Tests for the domain user model.

use super::*;
use rstest::rstest;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[rstest]
fn user_id_accepts_uuid() {
    let id = UserId::new(VALID_ID).expect("valid id");
    assert_eq!(id.to_string(), VALID_ID);
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("   ", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
fn user_id_rejects_bad_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw), Err(expected));
}

#[rstest]
#[case("Ada_Lovelace", "ada_lovelace")]
#[case("  grace99 ", "grace99")]
#[case("abc", "abc")]
fn username_is_trimmed_and_lowercased(#[case] raw: &str, #[case] expected: &str) {
    let username = Username::new(raw).expect("valid username");
    assert_eq!(username.as_ref(), expected);
}

#[rstest]
#[case("ab", UserValidationError::UsernameTooShort { min: USERNAME_MIN })]
#[case("has space", UserValidationError::UsernameInvalidCharacters)]
#[case("dash-ed", UserValidationError::UsernameInvalidCharacters)]
#[case("émile", UserValidationError::UsernameInvalidCharacters)]
fn username_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(raw), Err(expected));
}

#[rstest]
fn onboarding_limit_is_stricter_than_profile_limit() {
    let raw = "a".repeat(25);
    assert!(Username::new(raw.clone()).is_ok());
    assert_eq!(
        Username::for_onboarding(raw),
        Err(UserValidationError::UsernameTooLong {
            max: ONBOARDING_USERNAME_MAX
        })
    );
}

#[rstest]
fn profile_limit_rejects_long_usernames() {
    let raw = "a".repeat(USERNAME_MAX + 1);
    assert_eq!(
        Username::new(raw),
        Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX })
    );
}

#[rstest]
fn full_name_is_trimmed() {
    let name = FullName::new("  Ada Lovelace ").expect("valid name");
    assert_eq!(name.as_ref(), "Ada Lovelace");
    assert_eq!(FullName::new("   "), Err(UserValidationError::EmptyFullName));
}

#[rstest]
fn username_deserialisation_validates() {
    let parsed: Result<Username, _> = serde_json::from_str("\"x\"");
    assert!(parsed.is_err());
    let parsed: Username = serde_json::from_str("\"Valid_Name\"").expect("valid");
    assert_eq!(parsed.as_ref(), "valid_name");
}
