//! Unit tests for session configuration validation.

use super::*;
use rstest::rstest;
use std::io::Write as _;
use tempfile::NamedTempFile;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(&vec![b'a'; len]).expect("write key");
    file
}

fn toggles(path: PathBuf) -> SessionToggles {
    SessionToggles {
        key_file: path,
        cookie_secure: true,
        same_site: Some("Strict".to_owned()),
        allow_ephemeral: false,
    }
}

#[rstest]
fn release_accepts_a_strong_key() {
    let file = key_file(SESSION_KEY_MIN_LEN);
    let settings =
        session_settings(&toggles(file.path().to_path_buf()), BuildMode::Release).expect("valid");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
fn release_rejects_short_keys() {
    let file = key_file(SESSION_KEY_MIN_LEN - 1);
    let result = session_settings(&toggles(file.path().to_path_buf()), BuildMode::Release);
    assert!(matches!(
        result,
        Err(SessionConfigError::KeyTooShort { length, .. }) if length == SESSION_KEY_MIN_LEN - 1
    ));
}

#[rstest]
fn release_rejects_missing_key_file() {
    let result = session_settings(
        &toggles(PathBuf::from("/nonexistent/session_key")),
        BuildMode::Release,
    );
    assert!(matches!(result, Err(SessionConfigError::KeyRead { .. })));
}

#[rstest]
fn debug_generates_a_key_when_the_file_is_missing() {
    let settings = session_settings(
        &toggles(PathBuf::from("/nonexistent/session_key")),
        BuildMode::Debug,
    );
    assert!(settings.is_ok());
}

#[rstest]
fn release_refuses_ephemeral_keys() {
    let file = key_file(SESSION_KEY_MIN_LEN);
    let mut toggles = toggles(file.path().to_path_buf());
    toggles.allow_ephemeral = true;
    assert!(matches!(
        session_settings(&toggles, BuildMode::Release),
        Err(SessionConfigError::EphemeralNotAllowed)
    ));
}

#[rstest]
#[case(BuildMode::Release, true)]
#[case(BuildMode::Debug, false)]
fn same_site_none_requires_secure_in_release(#[case] mode: BuildMode, #[case] rejected: bool) {
    let file = key_file(SESSION_KEY_MIN_LEN);
    let mut toggles = toggles(file.path().to_path_buf());
    toggles.cookie_secure = false;
    toggles.same_site = Some("None".to_owned());
    let result = session_settings(&toggles, mode);
    assert_eq!(
        matches!(result, Err(SessionConfigError::InsecureSameSiteNone)),
        rejected
    );
}

#[rstest]
#[case(None, SameSite::Lax)]
#[case(Some("lax"), SameSite::Lax)]
#[case(Some("STRICT"), SameSite::Strict)]
fn same_site_values_are_case_insensitive(
    #[case] raw: Option<&str>,
    #[case] expected: SameSite,
) {
    let file = key_file(SESSION_KEY_MIN_LEN);
    let mut toggles = toggles(file.path().to_path_buf());
    toggles.same_site = raw.map(str::to_owned);
    let settings = session_settings(&toggles, BuildMode::Release).expect("valid");
    assert_eq!(settings.same_site, expected);
}

#[rstest]
fn release_rejects_unknown_same_site() {
    let file = key_file(SESSION_KEY_MIN_LEN);
    let mut toggles = toggles(file.path().to_path_buf());
    toggles.same_site = Some("sideways".to_owned());
    assert!(matches!(
        session_settings(&toggles, BuildMode::Release),
        Err(SessionConfigError::InvalidSameSite { .. })
    ));
}

#[rstest]
fn toggles_follow_app_settings() {
    let settings = AppSettings {
        session_cookie_secure: Some(false),
        session_same_site: Some("None".to_owned()),
        ..AppSettings::default()
    };
    let toggles = SessionToggles::from(&settings);
    assert!(!toggles.cookie_secure);
    assert_eq!(toggles.same_site.as_deref(), Some("None"));
    assert_eq!(
        toggles.key_file,
        PathBuf::from("/var/run/secrets/session_key")
    );
}
