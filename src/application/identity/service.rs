//! User management service: application-layer orchestration
//!
//! HTTP handlers are thin wrappers that delegate to this service.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info};

use crate::domain::user::dedup_preferences;
use crate::domain::{
    Category, CreateUserDto, DomainError, DomainResult, RepositoryProvider, UpdateUserDto, User,
};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Registration input; the password is still in clear text here.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub password: String,
    pub preferences: Vec<String>,
}

/// A user with preferences resolved to category records.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub preferences: Vec<Category>,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    // ── Registration ────────────────────────────────────────────

    pub async fn register(&self, input: RegisterUser) -> DomainResult<User> {
        let first_name = required("First name", &input.first_name)?;
        let last_name = required("Last name", &input.last_name)?;
        let phone = required("Phone", &input.phone)?;
        let email = required("Email", &input.email)?.to_lowercase();
        check_password(&input.password)?;

        if self.repos.users().get_user_by_email(&email).await?.is_some()
            || self.repos.users().get_user_by_phone(&phone).await?.is_some()
        {
            return Err(DomainError::DuplicateIdentity(
                "User with this email or phone already exists".into(),
            ));
        }

        let preferences = self.checked_preferences(input.preferences).await?;
        let password_hash = hash(&input.password)?;

        let user = self
            .repos
            .users()
            .create_user(CreateUserDto {
                first_name,
                last_name,
                phone,
                email,
                date_of_birth: input.date_of_birth,
                password_hash,
                preferences,
            })
            .await?;

        info!(user_id = %user.id, "New user registered");
        Ok(user)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Looks the identifier up as email or phone and checks the password.
    pub async fn login(&self, email_or_phone: &str, password: &str) -> DomainResult<AuthResult> {
        let identifier = email_or_phone.trim();
        let lookup = if identifier.contains('@') {
            identifier.to_lowercase()
        } else {
            identifier.to_string()
        };

        let Some(user) = self.repos.users().get_user_by_email_or_phone(&lookup).await? else {
            return Err(DomainError::InvalidCredentials);
        };

        if !password_matches(password, &user)? {
            return Err(DomainError::InvalidCredentials);
        }

        let token = create_token(&user.id, &self.jwt_config)
            .map_err(|e| DomainError::Storage(format!("Failed to create token: {}", e)))?;

        info!(user_id = %user.id, "User logged in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expires_in_seconds(),
            user,
        })
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        self.repos.users().get_user_by_id(id).await
    }

    pub async fn get_profile(&self, id: &str) -> DomainResult<UserProfile> {
        let user = self
            .repos
            .users()
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;
        self.resolve(user).await
    }

    // ── Commands (mutations) ────────────────────────────────────

    pub async fn update_profile(&self, id: &str, mut dto: UpdateUserDto) -> DomainResult<UserProfile> {
        let users = self.repos.users();
        let current = users
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        if let Some(first) = dto.first_name.take() {
            dto.first_name = Some(required("First name", &first)?);
        }
        if let Some(last) = dto.last_name.take() {
            dto.last_name = Some(required("Last name", &last)?);
        }

        if let Some(email) = dto.email.take() {
            let email = required("Email", &email)?.to_lowercase();
            if let Some(owner) = users.get_user_by_email(&email).await? {
                if owner.id != current.id {
                    return Err(DomainError::DuplicateIdentity("Email already in use".into()));
                }
            }
            dto.email = Some(email);
        }

        if let Some(phone) = dto.phone.take() {
            let phone = required("Phone", &phone)?;
            if let Some(owner) = users.get_user_by_phone(&phone).await? {
                if owner.id != current.id {
                    return Err(DomainError::DuplicateIdentity("Phone already in use".into()));
                }
            }
            dto.phone = Some(phone);
        }

        if let Some(preferences) = dto.preferences.take() {
            dto.preferences = Some(self.checked_preferences(preferences).await?);
        }

        let updated = users
            .update_user(id, dto)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        info!(user_id = %updated.id, "Profile updated");
        self.resolve(updated).await
    }

    /// Verifies the current password before storing the new one.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        check_password(new_password)?;

        let user = self
            .repos
            .users()
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        if !password_matches(current_password, &user)? {
            return Err(DomainError::InvalidCredentials);
        }

        let new_hash = hash(new_password)?;
        self.repos.users().update_user_password(user_id, &new_hash).await?;

        info!(user_id, "Password changed");
        Ok(())
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn resolve(&self, user: User) -> DomainResult<UserProfile> {
        let found = self.repos.categories().find_by_ids(&user.preferences).await?;
        // Keep the order the user picked them in.
        let preferences = user
            .preferences
            .iter()
            .filter_map(|id| found.iter().find(|c| &c.id == id).cloned())
            .collect();
        Ok(UserProfile { user, preferences })
    }

    async fn checked_preferences(&self, ids: Vec<String>) -> DomainResult<Vec<String>> {
        let ids = dedup_preferences(ids);
        if ids.is_empty() {
            return Ok(ids);
        }
        let found = self.repos.categories().find_by_ids(&ids).await?;
        if let Some(missing) = ids.iter().find(|id| !found.iter().any(|c| &c.id == *id)) {
            return Err(DomainError::Validation(format!("Unknown category: {}", missing)));
        }
        Ok(ids)
    }
}

fn required(field: &str, value: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn check_password(password: &str) -> DomainResult<()> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(DomainError::Validation(format!(
            "Password must be {}-{} characters",
            MIN_PASSWORD_LEN, MAX_PASSWORD_LEN
        )));
    }
    Ok(())
}

fn hash(password: &str) -> DomainResult<String> {
    hash_password(password).map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))
}

/// A stored hash bcrypt cannot parse is a server fault, not a wrong password.
fn password_matches(password: &str, user: &User) -> DomainResult<bool> {
    verify_password(password, &user.password_hash).map_err(|e| {
        error!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
        DomainError::Storage(format!("Password check failed: {}", e))
    })
}
