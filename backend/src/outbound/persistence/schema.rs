//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes the schema, regenerate this file with
//! `diesel print-schema` or update it by hand.

diesel::table! {
    /// Registered accounts.
    ///
    /// `email` and `username` carry the unique constraints `users_email_key`
    /// and `users_username_key`.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        email -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// One of `user`, `psychologist`, `admin`.
        role -> Varchar,
        gender -> Nullable<Varchar>,
        phone_number -> Nullable<Varchar>,
        age -> Nullable<Int2>,
        location -> Nullable<Varchar>,
        is_phone_verified -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Wellbeing articles, either hosted (`internal`) or linked (`external`).
    articles (id) {
        id -> Uuid,
        title -> Varchar,
        /// Discriminator: `internal` or `external`.
        article_type -> Varchar,
        content -> Nullable<Text>,
        external_url -> Nullable<Text>,
        external_source -> Nullable<Varchar>,
        original_author -> Nullable<Varchar>,
        excerpt -> Varchar,
        category -> Varchar,
        tags -> Array<Text>,
        featured_image -> Nullable<Text>,
        reading_time -> Int4,
        status -> Varchar,
        is_verified -> Bool,
        views -> Int8,
        clicks -> Int8,
        /// Author; cleared when the account is deleted.
        created_by -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-user mood history. Rows cascade with their owner.
    mood_entries (id) {
        id -> Uuid,
        user_id -> Uuid,
        /// Canonical mood label, e.g. `Calm`.
        mood -> Varchar,
        cause -> Nullable<Text>,
        recorded_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(mood_entries -> users (user_id));
diesel::joinable!(articles -> users (created_by));

diesel::allow_tables_to_appear_in_same_query!(articles, mood_entries, users);
