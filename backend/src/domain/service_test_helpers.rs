//! Builders shared by service unit tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{
    ExternalIdentity, PostCounts, PostId, PostRecord, ReplyPrivacy, User, UserId, Username,
};

/// Fixed timestamp `minutes` after 2024-01-01T00:00Z.
pub(crate) fn at(minutes: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_704_067_200 + minutes * 60, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn identity(email: &str) -> ExternalIdentity {
    ExternalIdentity {
        subject: format!("idp|{email}"),
        email: email.to_owned(),
        first_name: Some("Ada".to_owned()),
        last_name: Some("Lovelace".to_owned()),
        image_url: Some("https://img.example/ada.png".to_owned()),
    }
}

pub(crate) fn user(username: &str) -> User {
    User {
        id: UserId::random(),
        external_subject: format!("idp|{username}"),
        email: format!("{username}@example.com"),
        username: Username::new(username).expect("valid username"),
        full_name: Some(username.to_owned()),
        first_name: None,
        last_name: None,
        job_title: None,
        website: None,
        location: None,
        description: None,
        profile_image: None,
        verified: false,
        onboarding_complete: true,
        created_at: at(0),
        updated_at: at(0),
    }
}

pub(crate) fn post_by(author: &User, minutes: i64) -> PostRecord {
    PostRecord {
        id: PostId::random(),
        author: author.summary(),
        text: format!("post at {minutes}"),
        images: Vec::new(),
        reply_privacy: ReplyPrivacy::Public,
        parent_id: None,
        created_at: at(minutes),
        updated_at: at(minutes),
        counts: PostCounts::default(),
    }
}

pub(crate) fn reply_to(parent: &PostRecord, author: &User, minutes: i64) -> PostRecord {
    PostRecord {
        parent_id: Some(parent.id),
        ..post_by(author, minutes)
    }
}
