//! Userinfo payload as returned by OpenID Connect providers.

use serde::Deserialize;

use crate::domain::ExternalIdentity;

/// Standard claims read from the userinfo response. Unknown claims are
/// ignored.
#[derive(Debug, Deserialize)]
pub(super) struct UserinfoDto {
    sub: Option<String>,
    email: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    picture: Option<String>,
}

impl UserinfoDto {
    /// Convert into a domain identity; `sub` and `email` are mandatory.
    pub(super) fn into_identity(self) -> Result<ExternalIdentity, String> {
        let subject = non_blank(self.sub).ok_or("userinfo is missing `sub`")?;
        let email = non_blank(self.email).ok_or("userinfo is missing `email`")?;
        Ok(ExternalIdentity {
            subject,
            email,
            first_name: non_blank(self.given_name),
            last_name: non_blank(self.family_name),
            image_url: non_blank(self.picture),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

#[cfg(test)]
mod tests {
    //! Claim mapping coverage.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn maps_standard_claims() {
        let dto: UserinfoDto = serde_json::from_str(
            r#"{
                "sub": "auth0|42",
                "email": "ada@example.com",
                "given_name": "Ada",
                "family_name": "Lovelace",
                "picture": "https://img.example/ada.png",
                "locale": "en"
            }"#,
        )
        .expect("payload");
        let identity = dto.into_identity().expect("identity");
        assert_eq!(identity.subject, "auth0|42");
        assert_eq!(identity.first_name.as_deref(), Some("Ada"));
        assert_eq!(identity.image_url.as_deref(), Some("https://img.example/ada.png"));
    }

    #[rstest]
    #[case(r#"{"email": "ada@example.com"}"#)]
    #[case(r#"{"sub": "auth0|42"}"#)]
    #[case(r#"{"sub": " ", "email": "ada@example.com"}"#)]
    fn rejects_missing_mandatory_claims(#[case] body: &str) {
        let dto: UserinfoDto = serde_json::from_str(body).expect("payload");
        assert!(dto.into_identity().is_err());
    }
}
