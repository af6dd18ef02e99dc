use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::{require_owner, TokenCodec, TokenKind};
use crate::database::migrations::{USERS_EMAIL_KEY, USERS_USERNAME_KEY};
use crate::database::models::{NewUser, User, UserChanges};
use crate::database::{DatabaseError, Storage};
use crate::error::ApiError;
use crate::types::UserId;

use super::validation::{check_email, require, require_if_present};

pub const EMAIL_TAKEN: &str = "Email already exists";
pub const USERNAME_TAKEN: &str = "Username already exists";
const USER_NOT_FOUND: &str = "User not found";
const BAD_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterUser {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterUser {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require("email", &self.email, &mut errors);
        check_email(&self.email, &mut errors);
        require("username", &self.username, &mut errors);
        require("first_name", &self.first_name, &mut errors);
        require("last_name", &self.last_name, &mut errors);
        require("password", &self.password, &mut errors);
        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UpdateUser {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.email.is_none() && self.first_name.is_none() && self.last_name.is_none() {
            errors.push("at least one of email, first_name, last_name is required".to_string());
        }
        require_if_present("email", self.email.as_deref(), &mut errors);
        if let Some(email) = &self.email {
            check_email(email, &mut errors);
        }
        require_if_present("first_name", self.first_name.as_deref(), &mut errors);
        require_if_present("last_name", self.last_name.as_deref(), &mut errors);
        errors
    }

    fn into_changes(self) -> UserChanges {
        UserChanges {
            email: self.email.map(|s| s.trim().to_string()),
            first_name: self.first_name.map(|s| s.trim().to_string()),
            last_name: self.last_name.map(|s| s.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh: String,
}

/// Token pair plus the profile the client usually wants to show right away.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub expires_in: i64,
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Registration, login and self-service account operations.
#[derive(Clone)]
pub struct UserService {
    storage: Arc<dyn Storage>,
    tokens: Arc<TokenCodec>,
}

impl UserService {
    pub fn new(storage: Arc<dyn Storage>, tokens: Arc<TokenCodec>) -> Self {
        Self { storage, tokens }
    }

    /// Create a user. Email and username must be free among live users;
    /// the unique indexes settle any race between the check and the insert.
    pub async fn register(&self, input: RegisterUser) -> Result<User, ApiError> {
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(ApiError::validation_error("Validation failed", errors));
        }

        let users = self.storage.users();
        let email = input.email.trim().to_string();
        let username = input.username.trim().to_string();

        if users.find_active_by_email(&email).await?.is_some() {
            return Err(ApiError::conflict(EMAIL_TAKEN));
        }
        if users.find_active_by_username(&username).await?.is_some() {
            return Err(ApiError::conflict(USERNAME_TAKEN));
        }

        let password_hash = hash_password_blocking(input.password).await?;

        let user = users
            .insert(NewUser {
                email,
                username,
                first_name: input.first_name.trim().to_string(),
                last_name: input.last_name.trim().to_string(),
                password_hash,
            })
            .await
            .map_err(uniqueness_error)?;

        tracing::info!("Registered user {} ({})", user.id, user.username);
        Ok(user)
    }

    /// Exchange email and password for a token pair.
    pub async fn login(&self, input: LoginRequest) -> Result<LoginResponse, ApiError> {
        let user = self
            .storage
            .users()
            .find_active_by_email(input.email.trim())
            .await?;

        let Some(user) = user else {
            tracing::debug!("Login failed: no live user with that email");
            return Err(ApiError::unauthorized(BAD_CREDENTIALS));
        };

        if !verify_password_blocking(input.password, user.password.clone()).await? {
            tracing::debug!("Login failed: wrong password for user {}", user.id);
            return Err(ApiError::unauthorized(BAD_CREDENTIALS));
        }

        tracing::info!("User {} logged in", user.id);
        self.issue_for(&user)
    }

    /// Exchange a refresh token for a new pair. The user must still be live.
    pub async fn refresh(&self, input: RefreshRequest) -> Result<LoginResponse, ApiError> {
        let verified = self.tokens.verify(&input.refresh, TokenKind::Refresh)?;

        let user = self
            .storage
            .users()
            .find_active(verified.subject)
            .await?
            .ok_or_else(|| {
                tracing::debug!("Refresh rejected: user {} is gone", verified.subject);
                ApiError::unauthorized("Invalid or expired token")
            })?;

        self.issue_for(&user)
    }

    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.storage.users().list_active().await?)
    }

    /// A user may only read their own record.
    pub async fn get(&self, caller: UserId, id: UserId) -> Result<User, ApiError> {
        require_owner(caller, id)?;
        self.storage
            .users()
            .find_active(id)
            .await?
            .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))
    }

    /// Partial update of email and names, by the user themselves.
    pub async fn update(&self, caller: UserId, id: UserId, input: UpdateUser) -> Result<User, ApiError> {
        require_owner(caller, id)?;

        let errors = input.validate();
        if !errors.is_empty() {
            return Err(ApiError::validation_error("Validation failed", errors));
        }
        let changes = input.into_changes();

        let users = self.storage.users();
        if let Some(email) = &changes.email {
            if let Some(holder) = users.find_active_by_email(email).await? {
                if holder.id != id {
                    return Err(ApiError::conflict(EMAIL_TAKEN));
                }
            }
        }

        users
            .update(id, &changes)
            .await
            .map_err(uniqueness_error)?
            .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))
    }

    /// Soft delete by the user themselves; returns the record as it was.
    pub async fn delete(&self, caller: UserId, id: UserId) -> Result<User, ApiError> {
        require_owner(caller, id)?;

        let snapshot = self
            .storage
            .users()
            .soft_delete(id)
            .await?
            .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

        tracing::info!("Soft-deleted user {}", id);
        Ok(snapshot)
    }

    fn issue_for(&self, user: &User) -> Result<LoginResponse, ApiError> {
        let pair = self.tokens.issue(user.id, &user.profile())?;
        Ok(LoginResponse {
            access: pair.access,
            refresh: pair.refresh,
            expires_in: pair.expires_in,
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        })
    }
}

/// Name the field behind a unique index violation.
fn uniqueness_error(err: DatabaseError) -> ApiError {
    if let DatabaseError::UniqueViolation { constraint } = &err {
        if constraint == USERS_EMAIL_KEY {
            return ApiError::conflict(EMAIL_TAKEN);
        }
        if constraint == USERS_USERNAME_KEY {
            return ApiError::conflict(USERNAME_TAKEN);
        }
    }
    err.into()
}
