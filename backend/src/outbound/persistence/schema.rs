//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Accounts linked to an external identity.
    ///
    /// `username` is unique case-insensitively through the
    /// `users_username_lower_key` index.
    users (id) {
        id -> Uuid,
        external_subject -> Text,
        email -> Text,
        username -> Text,
        full_name -> Nullable<Text>,
        first_name -> Nullable<Text>,
        last_name -> Nullable<Text>,
        job_title -> Nullable<Text>,
        website -> Nullable<Text>,
        location -> Nullable<Text>,
        description -> Nullable<Text>,
        profile_image -> Nullable<Text>,
        verified -> Bool,
        onboarding_complete -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed follow edges.
    follows (follower_id, following_id) {
        follower_id -> Uuid,
        following_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Posts and replies with denormalised interaction counters.
    posts (id) {
        id -> Uuid,
        author_id -> Uuid,
        text -> Text,
        images -> Array<Text>,
        /// `PUBLIC` or `FOLLOWERS_ONLY`.
        reply_privacy -> Text,
        /// Parent post for replies; cascades on delete.
        parent_id -> Nullable<Uuid>,
        like_count -> Int8,
        reply_count -> Int8,
        repost_count -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    likes (user_id, post_id) {
        user_id -> Uuid,
        post_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    bookmarks (user_id, post_id) {
        user_id -> Uuid,
        post_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    reposts (user_id, post_id) {
        user_id -> Uuid,
        post_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Portfolio projects.
    projects (id) {
        id -> Uuid,
        author_id -> Uuid,
        title -> Text,
        description -> Nullable<Text>,
        url -> Nullable<Text>,
        client -> Nullable<Text>,
        start_month -> Text,
        start_year -> Text,
        images -> Array<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Portfolio work history.
    experiences (id) {
        id -> Uuid,
        author_id -> Uuid,
        title -> Text,
        company -> Text,
        description -> Text,
        url -> Nullable<Text>,
        start_month -> Text,
        start_year -> Text,
        end_month -> Nullable<Text>,
        end_year -> Nullable<Text>,
        images -> Array<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Contact channels shown on a profile.
    contact_methods (id) {
        id -> Uuid,
        user_id -> Uuid,
        contact_type -> Text,
        contact_username -> Text,
        url -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(posts -> users (author_id));
diesel::joinable!(likes -> posts (post_id));
diesel::joinable!(bookmarks -> posts (post_id));
diesel::joinable!(reposts -> posts (post_id));
diesel::joinable!(projects -> users (author_id));
diesel::joinable!(experiences -> users (author_id));
diesel::joinable!(contact_methods -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    follows,
    posts,
    likes,
    bookmarks,
    reposts,
    projects,
    experiences,
    contact_methods,
);
