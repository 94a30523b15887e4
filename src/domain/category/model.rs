use chrono::{DateTime, Utc};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trims surrounding whitespace; category names are otherwise stored as given.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_string()
}
