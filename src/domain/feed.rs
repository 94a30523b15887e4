//! Composed article feed

use super::article::Article;

/// Outcome of composing a viewer's feed.
///
/// `EmptyPreferred` is kept apart from an empty `Preferred` list: it means
/// none of the viewer's categories has any article at all, which clients
/// present differently from "everything here is hidden".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed {
    All(Vec<Article>),
    Preferred(Vec<Article>),
    EmptyPreferred,
}

impl Feed {
    pub fn articles(&self) -> &[Article] {
        match self {
            Feed::All(a) | Feed::Preferred(a) => a,
            Feed::EmptyPreferred => &[],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Feed::All(_) => "all",
            Feed::Preferred(_) => "preferred",
            Feed::EmptyPreferred => "empty_preferred",
        }
    }
}
