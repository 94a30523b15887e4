use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::domain::engagement::{toggle_block, toggle_reaction, EngagementAction, Reaction};

/// Article together with its three engagement sets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Stored image filename, if one was uploaded.
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub category_id: String,
    pub author_id: String,
    pub likes: BTreeSet<String>,
    pub dislikes: BTreeSet<String>,
    pub blocked_by: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn is_blocked_by(&self, user_id: &str) -> bool {
        self.blocked_by.contains(user_id)
    }

    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.author_id == user_id
    }

    pub fn reaction_of(&self, user_id: &str) -> Option<Reaction> {
        if self.likes.contains(user_id) {
            Some(Reaction::Like)
        } else if self.dislikes.contains(user_id) {
            Some(Reaction::Dislike)
        } else {
            None
        }
    }

    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn dislike_count(&self) -> usize {
        self.dislikes.len()
    }

    /// Applies a like/dislike toggle to the in-memory sets.
    pub fn apply_reaction(&mut self, user_id: &str, requested: Reaction) -> EngagementAction {
        let transition = toggle_reaction(self.reaction_of(user_id), requested);
        self.likes.remove(user_id);
        self.dislikes.remove(user_id);
        match transition.next {
            Some(Reaction::Like) => {
                self.likes.insert(user_id.to_string());
            }
            Some(Reaction::Dislike) => {
                self.dislikes.insert(user_id.to_string());
            }
            None => {}
        }
        transition.action
    }

    pub fn apply_block(&mut self, user_id: &str) -> EngagementAction {
        let (blocked, action) = toggle_block(self.is_blocked_by(user_id));
        if blocked {
            self.blocked_by.insert(user_id.to_string());
        } else {
            self.blocked_by.remove(user_id);
        }
        action
    }
}

/// Newest first; equal timestamps fall back to id so the order is stable.
pub fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Parses the tag field sent by clients.
///
/// Accepts a JSON array of strings (`["rust","web"]`) or a comma-separated
/// list (`rust, web`). Entries are trimmed and empty ones dropped.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let items: Vec<String> = match serde_json::from_str::<Vec<String>>(raw) {
        Ok(list) => list,
        Err(_) => raw.split(',').map(str::to_string).collect(),
    };

    items
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
