use chrono::{DateTime, NaiveDate, Utc};

/// Registered reader/author.
///
/// `preferences` holds category ids in the order the user picked them;
/// duplicates are removed before they are stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub password_hash: String,
    pub preferences: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_preferences(&self) -> bool {
        !self.preferences.is_empty()
    }
}

/// Removes repeated ids while keeping first-seen order.
pub fn dedup_preferences(ids: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty() && seen.insert(id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let ids = vec!["b".into(), "a".into(), "b".into(), " ".into(), "c".into()];
        assert_eq!(dedup_preferences(ids), vec!["b", "a", "c"]);
    }
}
