//! Fixtures shared by the store's unit tests.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use mockable::MockClock;

use crate::domain::ports::UserRepository;
use crate::domain::{FullName, NewUser, User, Username};

use super::InMemoryStore;

/// Store whose clock is frozen; row stamps still increase monotonically.
pub(super) fn store() -> InMemoryStore {
    let frozen = Utc
        .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .expect("fixed time");
    let mut clock = MockClock::new();
    clock.expect_utc().returning(move || frozen);
    InMemoryStore::new(Arc::new(clock))
}

pub(super) fn new_user(name: &str) -> NewUser {
    let lowered = name.to_lowercase();
    NewUser {
        external_subject: format!("dev|{lowered}@example.com"),
        email: format!("{lowered}@example.com"),
        username: Username::new(name).expect("username"),
        full_name: FullName::new(name).expect("full name"),
        first_name: None,
        last_name: None,
        profile_image: None,
    }
}

pub(super) async fn seed_user(store: &InMemoryStore, name: &str) -> User {
    UserRepository::create(store, &new_user(name))
        .await
        .expect("seed user")
}
