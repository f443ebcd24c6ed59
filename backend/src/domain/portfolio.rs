//! Portfolio entries shown on profile pages: projects, work experience, and
//! contact methods.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;
use super::web_url::{HTTP_SCHEMES, PROJECT_SCHEMES, parse_web_url};

/// Validation failures for portfolio forms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortfolioValidationError {
    /// A required text field was blank.
    #[error("{field} is required")]
    Required {
        /// Offending field.
        field: &'static str,
    },
    /// A URL field failed validation.
    #[error("{field} must be a valid URL")]
    InvalidUrl {
        /// Offending field.
        field: &'static str,
    },
    /// A year was not four digits.
    #[error("{field} must be a 4-digit number")]
    InvalidYear {
        /// Offending field.
        field: &'static str,
    },
    /// An identifier was not a UUID.
    #[error("{field} must be a valid UUID")]
    InvalidId {
        /// Offending field.
        field: &'static str,
    },
    /// Only one half of the end date was supplied.
    #[error("end month and end year must be provided together")]
    PartialEndDate,
    /// The end date precedes the start date.
    #[error("end date must not be before start date")]
    EndBeforeStart,
}

macro_rules! portfolio_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier.
            pub fn new(id: impl AsRef<str>) -> Result<Self, PortfolioValidationError> {
                Uuid::parse_str(id.as_ref().trim())
                    .map(Self)
                    .map_err(|_| PortfolioValidationError::InvalidId { field: $field })
            }

            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

portfolio_id!(
    /// Project identifier.
    ProjectId,
    "projectId"
);
portfolio_id!(
    /// Experience identifier.
    ExperienceId,
    "experienceId"
);
portfolio_id!(
    /// Contact method identifier.
    ContactMethodId,
    "contactMethodId"
);

/// Calendar month used by portfolio dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Month {
    /// January.
    January,
    /// February.
    February,
    /// March.
    March,
    /// April.
    April,
    /// May.
    May,
    /// June.
    June,
    /// July.
    July,
    /// August.
    August,
    /// September.
    September,
    /// October.
    October,
    /// November.
    November,
    /// December.
    December,
}

impl Month {
    const ALL: [Self; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// Database spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::January => "JANUARY",
            Self::February => "FEBRUARY",
            Self::March => "MARCH",
            Self::April => "APRIL",
            Self::May => "MAY",
            Self::June => "JUNE",
            Self::July => "JULY",
            Self::August => "AUGUST",
            Self::September => "SEPTEMBER",
            Self::October => "OCTOBER",
            Self::November => "NOVEMBER",
            Self::December => "DECEMBER",
        }
    }

    /// Parse the database spelling.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|month| month.as_str() == raw)
    }
}

/// Four-digit calendar year, serialised as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Year(u16);

impl Year {
    /// Parse a four-digit year.
    pub fn parse(raw: &str, field: &'static str) -> Result<Self, PortfolioValidationError> {
        let trimmed = raw.trim();
        if trimmed.len() != 4 || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(PortfolioValidationError::InvalidYear { field });
        }
        trimmed
            .parse()
            .map(Self)
            .map_err(|_| PortfolioValidationError::InvalidYear { field })
    }

    /// Numeric value.
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl From<Year> for String {
    fn from(value: Year) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Year {
    type Error = PortfolioValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value, "year")
    }
}

fn required(raw: String, field: &'static str) -> Result<String, PortfolioValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PortfolioValidationError::Required { field });
    }
    Ok(trimmed.to_owned())
}

fn optional(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn optional_url(
    raw: Option<String>,
    schemes: &[&str],
    field: &'static str,
) -> Result<Option<String>, PortfolioValidationError> {
    optional(raw)
        .map(|value| {
            parse_web_url(&value, schemes).map_err(|_| PortfolioValidationError::InvalidUrl { field })
        })
        .transpose()
}

fn image_urls(images: Vec<String>) -> Result<Vec<String>, PortfolioValidationError> {
    images
        .iter()
        .map(|raw| {
            parse_web_url(raw, HTTP_SCHEMES)
                .map_err(|_| PortfolioValidationError::InvalidUrl { field: "images" })
        })
        .collect()
}

/// Unvalidated project form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectInput {
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Link to the project.
    pub url: Option<String>,
    /// Client name.
    pub client: Option<String>,
    /// Start month.
    pub start_month: Option<Month>,
    /// Start year.
    pub start_year: Option<String>,
    /// Screenshot URLs.
    pub images: Vec<String>,
}

/// Validated project fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Link to the project; http, https, or ftp.
    pub url: Option<String>,
    /// Client name.
    pub client: Option<String>,
    /// Start month.
    pub start_month: Month,
    /// Start year.
    pub start_year: Year,
    /// Screenshot URLs.
    pub images: Vec<String>,
}

impl TryFrom<ProjectInput> for ProjectDraft {
    type Error = PortfolioValidationError;

    fn try_from(value: ProjectInput) -> Result<Self, Self::Error> {
        Ok(Self {
            title: required(value.title, "title")?,
            description: optional(value.description),
            url: optional_url(value.url, PROJECT_SCHEMES, "url")?,
            client: optional(value.client),
            start_month: value
                .start_month
                .ok_or(PortfolioValidationError::Required { field: "startMonth" })?,
            start_year: Year::parse(
                value.start_year.as_deref().unwrap_or_default(),
                "startYear",
            )?,
            images: image_urls(value.images)?,
        })
    }
}

/// Stored project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Identifier.
    pub id: ProjectId,
    /// Owner.
    pub author_id: UserId,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Link.
    pub url: Option<String>,
    /// Client name.
    pub client: Option<String>,
    /// Start month.
    pub start_month: Month,
    /// Start year.
    pub start_year: Year,
    /// Screenshot URLs.
    pub images: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Unvalidated experience form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperienceInput {
    /// Role title.
    pub title: String,
    /// Employer.
    pub company: String,
    /// Role summary.
    pub description: String,
    /// Company link.
    pub url: Option<String>,
    /// Start month.
    pub start_month: Option<Month>,
    /// Start year.
    pub start_year: Option<String>,
    /// End month.
    pub end_month: Option<Month>,
    /// End year.
    pub end_year: Option<String>,
    /// Image URLs.
    pub images: Vec<String>,
}

/// Validated experience fields.
///
/// ## Invariants
/// - `end_month` and `end_year` are both present or both absent.
/// - When present, the end date is not before the start date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceDraft {
    /// Role title.
    pub title: String,
    /// Employer.
    pub company: String,
    /// Role summary.
    pub description: String,
    /// Company link.
    pub url: Option<String>,
    /// Start month.
    pub start_month: Month,
    /// Start year.
    pub start_year: Year,
    /// End month.
    pub end_month: Option<Month>,
    /// End year.
    pub end_year: Option<Year>,
    /// Image URLs.
    pub images: Vec<String>,
}

impl TryFrom<ExperienceInput> for ExperienceDraft {
    type Error = PortfolioValidationError;

    fn try_from(value: ExperienceInput) -> Result<Self, Self::Error> {
        let start_month = value
            .start_month
            .ok_or(PortfolioValidationError::Required { field: "startMonth" })?;
        let start_year = Year::parse(value.start_year.as_deref().unwrap_or_default(), "startYear")?;
        let end_year = optional(value.end_year)
            .map(|raw| Year::parse(&raw, "endYear"))
            .transpose()?;
        let end_month = value.end_month;
        match (end_month, end_year) {
            (Some(month), Some(year)) if (year, month) < (start_year, start_month) => {
                return Err(PortfolioValidationError::EndBeforeStart);
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(PortfolioValidationError::PartialEndDate);
            }
            _ => {}
        }
        Ok(Self {
            title: required(value.title, "title")?,
            company: required(value.company, "company")?,
            description: required(value.description, "description")?,
            url: optional_url(value.url, HTTP_SCHEMES, "url")?,
            start_month,
            start_year,
            end_month,
            end_year,
            images: image_urls(value.images)?,
        })
    }
}

/// Stored experience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    /// Identifier.
    pub id: ExperienceId,
    /// Owner.
    pub author_id: UserId,
    /// Role title.
    pub title: String,
    /// Employer.
    pub company: String,
    /// Role summary.
    pub description: String,
    /// Company link.
    pub url: Option<String>,
    /// Start month.
    pub start_month: Month,
    /// Start year.
    pub start_year: Year,
    /// End month.
    pub end_month: Option<Month>,
    /// End year.
    pub end_year: Option<Year>,
    /// Image URLs.
    pub images: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Supported contact channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactType {
    /// Figma community profile.
    Figma,
    /// GitHub account.
    Github,
    /// LinkedIn profile.
    Linkedin,
    /// Twitter handle.
    Twitter,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
}

impl ContactType {
    const ALL: [Self; 6] = [
        Self::Figma,
        Self::Github,
        Self::Linkedin,
        Self::Twitter,
        Self::Email,
        Self::Phone,
    ];

    /// Database spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Figma => "FIGMA",
            Self::Github => "GITHUB",
            Self::Linkedin => "LINKEDIN",
            Self::Twitter => "TWITTER",
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
        }
    }

    /// Parse the database spelling.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }

    /// Prefix joined with the handle to build the contact link.
    pub const fn url_prefix(self) -> &'static str {
        match self {
            Self::Figma => "https://www.figma.com/@",
            Self::Github => "https://github.com/",
            Self::Linkedin => "https://www.linkedin.com/in/",
            Self::Twitter => "https://twitter.com/",
            Self::Email => "mailto:",
            Self::Phone => "tel:",
        }
    }
}

/// Validated contact method fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    /// Channel.
    pub kind: ContactType,
    /// Handle, address, or number.
    pub contact_username: String,
}

impl ContactDraft {
    /// Validate a contact method.
    pub fn new(
        kind: Option<ContactType>,
        contact_username: impl Into<String>,
    ) -> Result<Self, PortfolioValidationError> {
        Ok(Self {
            kind: kind.ok_or(PortfolioValidationError::Required { field: "type" })?,
            contact_username: required(contact_username.into(), "contactUsername")?,
        })
    }

    /// Link derived from the channel prefix and handle.
    pub fn url(&self) -> String {
        format!("{}{}", self.kind.url_prefix(), self.contact_username)
    }
}

/// Stored contact method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMethod {
    /// Identifier.
    pub id: ContactMethodId,
    /// Owner.
    pub user_id: UserId,
    /// Channel.
    #[serde(rename = "type")]
    pub kind: ContactType,
    /// Handle, address, or number.
    pub contact_username: String,
    /// Derived link.
    pub url: String,
}

#[cfg(test)]
mod tests {
    //! Form validation coverage.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn experience_input() -> ExperienceInput {
        ExperienceInput {
            title: "Engineer".to_owned(),
            company: "Analytical Engines".to_owned(),
            description: "Built things".to_owned(),
            start_month: Some(Month::March),
            start_year: Some("2020".to_owned()),
            ..ExperienceInput::default()
        }
    }

    #[rstest]
    fn project_requires_title_and_start_date() {
        let missing_title = ProjectInput {
            title: "  ".to_owned(),
            start_month: Some(Month::May),
            start_year: Some("2021".to_owned()),
            ..ProjectInput::default()
        };
        assert_eq!(
            ProjectDraft::try_from(missing_title),
            Err(PortfolioValidationError::Required { field: "title" })
        );

        let missing_month = ProjectInput {
            title: "Site".to_owned(),
            start_year: Some("2021".to_owned()),
            ..ProjectInput::default()
        };
        assert_eq!(
            ProjectDraft::try_from(missing_month),
            Err(PortfolioValidationError::Required { field: "startMonth" })
        );
    }

    #[rstest]
    #[case("ftp://files.example.com", true)]
    #[case("https://example.com", true)]
    #[case("mailto:me@example.com", false)]
    fn project_url_schemes(#[case] url: &str, #[case] ok: bool) {
        let input = ProjectInput {
            title: "Site".to_owned(),
            url: Some(url.to_owned()),
            start_month: Some(Month::May),
            start_year: Some("2021".to_owned()),
            ..ProjectInput::default()
        };
        assert_eq!(ProjectDraft::try_from(input).is_ok(), ok);
    }

    #[rstest]
    #[case("202")]
    #[case("20a1")]
    #[case("20211")]
    fn years_must_have_four_digits(#[case] raw: &str) {
        assert_eq!(
            Year::parse(raw, "startYear"),
            Err(PortfolioValidationError::InvalidYear { field: "startYear" })
        );
    }

    #[rstest]
    fn experience_accepts_open_ended_roles(experience_input: ExperienceInput) {
        let draft = ExperienceDraft::try_from(experience_input).expect("valid");
        assert!(draft.end_month.is_none());
        assert!(draft.end_year.is_none());
    }

    #[rstest]
    #[case(Month::March, "2020", None)]
    #[case(Month::January, "2021", None)]
    #[case(Month::February, "2020", Some(PortfolioValidationError::EndBeforeStart))]
    #[case(Month::December, "2019", Some(PortfolioValidationError::EndBeforeStart))]
    fn experience_end_must_follow_start(
        experience_input: ExperienceInput,
        #[case] end_month: Month,
        #[case] end_year: &str,
        #[case] expected: Option<PortfolioValidationError>,
    ) {
        let input = ExperienceInput {
            end_month: Some(end_month),
            end_year: Some(end_year.to_owned()),
            ..experience_input
        };
        assert_eq!(ExperienceDraft::try_from(input).err(), expected);
    }

    #[rstest]
    fn experience_rejects_half_an_end_date(experience_input: ExperienceInput) {
        let input = ExperienceInput {
            end_year: Some("2022".to_owned()),
            ..experience_input
        };
        assert_eq!(
            ExperienceDraft::try_from(input),
            Err(PortfolioValidationError::PartialEndDate)
        );
    }

    #[rstest]
    #[case(ContactType::Github, "ada", "https://github.com/ada")]
    #[case(ContactType::Email, "ada@example.com", "mailto:ada@example.com")]
    #[case(ContactType::Phone, "+441234", "tel:+441234")]
    #[case(ContactType::Figma, "ada", "https://www.figma.com/@ada")]
    fn contact_url_uses_prefix(#[case] kind: ContactType, #[case] handle: &str, #[case] url: &str) {
        let draft = ContactDraft::new(Some(kind), handle).expect("valid contact");
        assert_eq!(draft.url(), url);
    }

    #[rstest]
    fn contact_requires_handle() {
        assert_eq!(
            ContactDraft::new(Some(ContactType::Twitter), " "),
            Err(PortfolioValidationError::Required {
                field: "contactUsername"
            })
        );
    }

    #[rstest]
    fn month_round_trips_database_spelling() {
        assert_eq!(Month::parse("OCTOBER"), Some(Month::October));
        assert_eq!(Month::parse("october"), None);
    }
}
