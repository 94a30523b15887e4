//! Fixtures shared by the unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

use crate::application::identity::RegisterUser;
use crate::application::ports::{ImageStore, ImageUpload};

use crate::domain::{
    Article, ArticleRepository, Category, CategoryRepository, CreateUserDto, DomainError,
    DomainResult, NewArticle, RepositoryProvider, User, UserRepository,
};
use crate::infrastructure::database::repositories::{
    SeaOrmArticleRepository, SeaOrmCategoryRepository, SeaOrmRepositoryProvider,
    SeaOrmUserRepository,
};
use crate::infrastructure::database::{init_and_migrate, DatabaseConfig};

/// Fresh, migrated in-memory database.
pub async fn test_db() -> DatabaseConnection {
    init_and_migrate(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory database")
}

pub fn test_repos(db: &DatabaseConnection) -> Arc<dyn RepositoryProvider> {
    Arc::new(SeaOrmRepositoryProvider::new(db.clone()))
}

/// Registration input whose password is `secret123`.
pub fn register_input(email: &str, phone: &str) -> RegisterUser {
    RegisterUser {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        phone: phone.into(),
        email: email.into(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).expect("valid date"),
        password: "secret123".into(),
        preferences: Vec::new(),
    }
}

pub fn new_user_dto(email: &str, phone: &str) -> CreateUserDto {
    CreateUserDto {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        phone: phone.into(),
        email: email.into(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).expect("valid date"),
        password_hash: "not-a-real-hash".into(),
        preferences: Vec::new(),
    }
}

pub async fn seed_user(db: &DatabaseConnection, email: &str, phone: &str) -> User {
    SeaOrmUserRepository::new(db.clone())
        .create_user(new_user_dto(email, phone))
        .await
        .expect("seed user")
}

pub async fn seed_category(db: &DatabaseConnection, name: &str) -> Category {
    SeaOrmCategoryRepository::new(db.clone())
        .create(name)
        .await
        .expect("seed category")
}

pub async fn seed_article(db: &DatabaseConnection, author_id: &str, category_id: &str, title: &str) -> Article {
    SeaOrmArticleRepository::new(db.clone())
        .create(NewArticle {
            title: title.into(),
            description: format!("{title} body"),
            image: None,
            tags: vec!["general".into()],
            category_id: category_id.into(),
            author_id: author_id.into(),
        })
        .await
        .expect("seed article")
}

pub fn png_upload() -> ImageUpload {
    ImageUpload {
        content_type: "image/png".into(),
        original_name: Some("cover.png".into()),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

/// Image store that keeps filenames in memory.
#[derive(Default)]
pub struct MemoryImageStore {
    pub saved: Mutex<Vec<String>>,
    pub removed: Mutex<Vec<String>>,
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn save(&self, upload: ImageUpload) -> DomainResult<String> {
        if !upload.is_image() {
            return Err(DomainError::Validation("Only image files are allowed".into()));
        }
        let mut saved = self.saved.lock().expect("lock");
        let name = format!("image_{}.png", saved.len());
        saved.push(name.clone());
        Ok(name)
    }

    async fn remove(&self, filename: &str) {
        self.removed.lock().expect("lock").push(filename.to_string());
    }
}
