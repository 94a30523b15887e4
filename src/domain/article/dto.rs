/// Fields for a new article. `author_id` comes from the authenticated user.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub category_id: String,
    pub author_id: String,
}

/// Partial update; `None` keeps the stored value. The author never changes.
#[derive(Debug, Clone, Default)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category_id: Option<String>,
}

/// Read-side filter shared by every list projection.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    /// Restrict to these categories. An empty list matches nothing.
    pub category_ids: Option<Vec<String>>,
    pub author_id: Option<String>,
    /// Hide articles this user has blocked.
    pub exclude_blocked_for: Option<String>,
}

impl ArticleFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_categories(ids: Vec<String>) -> Self {
        Self {
            category_ids: Some(ids),
            ..Self::default()
        }
    }

    pub fn by_author(author_id: impl Into<String>) -> Self {
        Self {
            author_id: Some(author_id.into()),
            ..Self::default()
        }
    }

    pub fn hiding_blocked_for(mut self, viewer: Option<&str>) -> Self {
        self.exclude_blocked_for = viewer.map(str::to_string);
        self
    }
}
