use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tracing::warn;

use crate::domain::{CreateUserDto, DomainError, DomainResult, UpdateUserDto, User, UserRepository};
use crate::infrastructure::database::entities::user;
use crate::shared::InfraError;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model) -> User {
    let preferences = serde_json::from_str(&model.preferences).unwrap_or_else(|e| {
        warn!(user_id = %model.id, error = %e, "Unreadable preferences column, treating as empty");
        Vec::new()
    });

    User {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        phone: model.phone,
        email: model.email,
        date_of_birth: model.date_of_birth,
        password_hash: model.password_hash,
        preferences,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn encode_preferences(ids: &[String]) -> DomainResult<String> {
    serde_json::to_string(ids).map_err(|e| InfraError::from(e).into())
}

fn map_write_err(e: sea_orm::DbErr) -> DomainError {
    let msg = e.to_string();
    if msg.contains("UNIQUE") || msg.contains("duplicate") {
        DomainError::DuplicateIdentity("Email or phone already in use".to_string())
    } else {
        e.into()
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();

        let new_user = user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            first_name: Set(dto.first_name),
            last_name: Set(dto.last_name),
            phone: Set(dto.phone),
            email: Set(dto.email),
            date_of_birth: Set(dto.date_of_birth),
            password_hash: Set(dto.password_hash),
            preferences: Set(encode_preferences(&dto.preferences)?),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = new_user.insert(&self.db).await.map_err(map_write_err)?;
        Ok(user_model_to_domain(model))
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_phone(&self, phone: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Phone.eq(phone))
            .one(&self.db)
            .await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_email_or_phone(&self, value: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(value))
                    .add(user::Column::Phone.eq(value)),
            )
            .one(&self.db)
            .await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn update_user(&self, id: &str, dto: UpdateUserDto) -> DomainResult<Option<User>> {
        let Some(existing) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();

        if let Some(first_name) = dto.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = dto.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(phone) = dto.phone {
            active.phone = Set(phone);
        }
        if let Some(email) = dto.email {
            active.email = Set(email);
        }
        if let Some(date_of_birth) = dto.date_of_birth {
            active.date_of_birth = Set(date_of_birth);
        }
        if let Some(preferences) = dto.preferences {
            active.preferences = Set(encode_preferences(&preferences)?);
        }

        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(map_write_err)?;
        Ok(Some(user_model_to_domain(updated)))
    }

    async fn update_user_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()> {
        let Some(existing) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Err(DomainError::not_found("User", id));
        };

        let mut active: user::ActiveModel = existing.into();
        active.password_hash = Set(new_password_hash.to_string());
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{new_user_dto, test_db};

    #[tokio::test]
    async fn creates_and_finds_by_either_identifier() {
        let repo = SeaOrmUserRepository::new(test_db().await);
        let created = repo.create_user(new_user_dto("ada@example.com", "555-0100")).await.unwrap();

        let by_email = repo.get_user_by_email_or_phone("ada@example.com").await.unwrap();
        let by_phone = repo.get_user_by_email_or_phone("555-0100").await.unwrap();
        assert_eq!(by_email.as_ref().map(|u| &u.id), Some(&created.id));
        assert_eq!(by_phone.map(|u| u.id), Some(created.id));
        assert!(repo.get_user_by_email_or_phone("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unique_violation_maps_to_duplicate_identity() {
        let repo = SeaOrmUserRepository::new(test_db().await);
        repo.create_user(new_user_dto("ada@example.com", "555-0100")).await.unwrap();

        let err = repo
            .create_user(new_user_dto("ada@example.com", "555-0199"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateIdentity(_)));
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let repo = SeaOrmUserRepository::new(test_db().await);
        let created = repo.create_user(new_user_dto("ada@example.com", "555-0100")).await.unwrap();

        let updated = repo
            .update_user(
                &created.id,
                UpdateUserDto {
                    last_name: Some("King".into()),
                    preferences: Some(vec!["c1".into(), "c2".into()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.last_name, "King");
        assert_eq!(updated.first_name, created.first_name);
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.preferences, vec!["c1", "c2"]);
        assert!(repo.update_user("missing", UpdateUserDto::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn password_update_requires_existing_user() {
        let repo = SeaOrmUserRepository::new(test_db().await);
        let err = repo.update_user_password("missing", "hash").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "User", .. }));
    }
}
