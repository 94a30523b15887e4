//! Builds a viewer's feed from their category preferences.
//!
//! Without a viewer or preferences the feed is every article. Otherwise it
//! is the union of the preferred categories' articles. Either way articles
//! the viewer blocked are dropped and the result is newest first.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::domain::article::sort_newest_first;
use crate::domain::{ArticleFilter, DomainResult, Feed, RepositoryProvider, User};

pub struct FeedComposer {
    repos: Arc<dyn RepositoryProvider>,
}

impl FeedComposer {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn compose(&self, viewer: Option<&User>) -> DomainResult<Feed> {
        let articles = self.repos.articles();

        let Some(viewer) = viewer.filter(|u| u.has_preferences()) else {
            let all = articles
                .find(ArticleFilter::all().hiding_blocked_for(viewer.map(|u| u.id.as_str())))
                .await?;
            return Ok(Feed::All(all));
        };

        // Union across categories, keyed by id. Blocks are applied after so an
        // entirely blocked feed stays distinguishable from an empty one.
        let mut seen = HashSet::new();
        let mut union = Vec::new();
        for category_id in &viewer.preferences {
            let found = articles
                .find(ArticleFilter::in_categories(vec![category_id.clone()]))
                .await?;
            union.extend(found.into_iter().filter(|a| seen.insert(a.id.clone())));
        }

        if union.is_empty() {
            debug!(user_id = %viewer.id, "No articles in preferred categories");
            return Ok(Feed::EmptyPreferred);
        }

        union.retain(|a| !a.is_blocked_by(&viewer.id));
        sort_newest_first(&mut union);
        Ok(Feed::Preferred(union))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EngagementRepository, UpdateUserDto, UserRepository};
    use crate::infrastructure::database::repositories::{SeaOrmEngagementRepository, SeaOrmUserRepository};
    use crate::test_support::{seed_article, seed_category, seed_user, test_db, test_repos};
    use sea_orm::DatabaseConnection;

    async fn with_preferences(db: &DatabaseConnection, user: &User, prefs: Vec<String>) -> User {
        SeaOrmUserRepository::new(db.clone())
            .update_user(
                &user.id,
                UpdateUserDto {
                    preferences: Some(prefs),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn anonymous_and_preference_less_viewers_get_everything() {
        let db = test_db().await;
        let composer = FeedComposer::new(test_repos(&db));
        assert_eq!(composer.compose(None).await.unwrap(), Feed::All(vec![]));

        let author = seed_user(&db, "a@example.com", "1").await;
        let cat = seed_category(&db, "Tech").await;
        seed_article(&db, &author.id, &cat.id, "one").await;
        seed_article(&db, &author.id, &cat.id, "two").await;

        let feed = composer.compose(Some(&author)).await.unwrap();
        assert_eq!(feed.kind(), "all");
        assert_eq!(feed.articles().len(), 2);
    }

    #[tokio::test]
    async fn preferences_without_articles_signal_empty_preferred() {
        let db = test_db().await;
        let author = seed_user(&db, "a@example.com", "1").await;
        let reader = seed_user(&db, "r@example.com", "2").await;
        let cat_a = seed_category(&db, "A").await;
        let cat_b = seed_category(&db, "B").await;
        seed_article(&db, &author.id, &cat_b.id, "only in B").await;

        let reader = with_preferences(&db, &reader, vec![cat_a.id]).await;
        let feed = FeedComposer::new(test_repos(&db)).compose(Some(&reader)).await.unwrap();
        assert_eq!(feed, Feed::EmptyPreferred);
    }

    #[tokio::test]
    async fn preferred_feed_unions_categories_and_drops_blocked() {
        let db = test_db().await;
        let author = seed_user(&db, "a@example.com", "1").await;
        let reader = seed_user(&db, "r@example.com", "2").await;
        let cat_a = seed_category(&db, "A").await;
        let cat_b = seed_category(&db, "B").await;
        let cat_c = seed_category(&db, "C").await;
        let in_a = seed_article(&db, &author.id, &cat_a.id, "a").await;
        let in_b = seed_article(&db, &author.id, &cat_b.id, "b").await;
        let blocked = seed_article(&db, &author.id, &cat_b.id, "blocked").await;
        seed_article(&db, &author.id, &cat_c.id, "c").await;

        SeaOrmEngagementRepository::new(db.clone())
            .toggle_block(&blocked.id, &reader.id)
            .await
            .unwrap();

        let reader = with_preferences(&db, &reader, vec![cat_a.id, cat_b.id]).await;
        let feed = FeedComposer::new(test_repos(&db)).compose(Some(&reader)).await.unwrap();

        assert_eq!(feed.kind(), "preferred");
        let mut ids: Vec<_> = feed.articles().iter().map(|a| a.id.clone()).collect();
        ids.sort();
        let mut expected = vec![in_a.id, in_b.id];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn fully_blocked_preferred_feed_is_empty_not_empty_preferred() {
        let db = test_db().await;
        let author = seed_user(&db, "a@example.com", "1").await;
        let reader = seed_user(&db, "r@example.com", "2").await;
        let cat = seed_category(&db, "A").await;
        let only = seed_article(&db, &author.id, &cat.id, "a").await;
        SeaOrmEngagementRepository::new(db.clone())
            .toggle_block(&only.id, &reader.id)
            .await
            .unwrap();

        let reader = with_preferences(&db, &reader, vec![cat.id]).await;
        let feed = FeedComposer::new(test_repos(&db)).compose(Some(&reader)).await.unwrap();
        assert_eq!(feed, Feed::Preferred(vec![]));
    }

    #[tokio::test]
    async fn all_branch_hides_blocked_for_viewer() {
        let db = test_db().await;
        let author = seed_user(&db, "a@example.com", "1").await;
        let reader = seed_user(&db, "r@example.com", "2").await;
        let cat = seed_category(&db, "A").await;
        let hidden = seed_article(&db, &author.id, &cat.id, "hidden").await;
        let shown = seed_article(&db, &author.id, &cat.id, "shown").await;
        SeaOrmEngagementRepository::new(db.clone())
            .toggle_block(&hidden.id, &reader.id)
            .await
            .unwrap();

        let feed = FeedComposer::new(test_repos(&db)).compose(Some(&reader)).await.unwrap();
        assert_eq!(feed.kind(), "all");
        assert_eq!(feed.articles().iter().map(|a| &a.id).collect::<Vec<_>>(), vec![&shown.id]);
    }
}
