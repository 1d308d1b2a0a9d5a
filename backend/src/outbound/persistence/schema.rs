//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly.

diesel::table! {
    /// User documents.
    ///
    /// `addresses` is a JSON array of address objects; index 0 is the home
    /// address.
    users (user_id) {
        user_id -> Text,
        addresses -> Jsonb,
    }
}
