//! User service for account management
//!
//! # Performance Optimizations
//!
//! - Password hashing runs on blocking thread pool
//! - Storage is behind a trait object, shared through `AppState`

use crate::auth::PasswordService;
use crate::config::AdminConfig;
use crate::error::ApiError;
use crate::repositories::{NewUser, UpdateUser, UserStore};
use secrecy::SecretString;
use tracing::info;
use user_service_shared::validation::{validate_create_user, validate_update_user};
use user_service_shared::{CreateUserRequest, UpdateUserRequest, User};

/// User service for CRUD operations
pub struct UserService;

impl UserService {
    /// Create a new user
    ///
    /// # Performance
    /// Password hashing is offloaded to blocking thread pool via `spawn_blocking`.
    pub async fn create(
        store: &dyn UserStore,
        passwords: &PasswordService,
        req: CreateUserRequest,
    ) -> Result<User, ApiError> {
        let errors = validate_create_user(&req);
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        if store.email_exists(&req.email).await? {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = passwords
            .hash_async(req.password)
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;

        let record = store
            .insert(NewUser {
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                password_hash,
                is_admin: false,
            })
            .await?;

        info!(user_id = record.id, "User created");
        Ok(record.into())
    }

    pub async fn list(store: &dyn UserStore) -> Result<Vec<User>, ApiError> {
        let records = store.list().await?;
        Ok(records.into_iter().map(User::from).collect())
    }

    pub async fn get(store: &dyn UserStore, id: i64) -> Result<User, ApiError> {
        store
            .get(id)
            .await?
            .map(User::from)
            .ok_or_else(|| not_found(id))
    }

    /// Apply a patch to a user
    ///
    /// An empty patch is a bad request, not a no-op.
    pub async fn update(
        store: &dyn UserStore,
        id: i64,
        req: UpdateUserRequest,
    ) -> Result<User, ApiError> {
        if req.is_empty() {
            return Err(ApiError::BadRequest("no fields to update".to_string()));
        }
        let errors = validate_update_user(&req);
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        if let Some(email) = &req.email {
            if let Some(owner) = store.find_by_email(email).await? {
                if owner.user_id != id {
                    return Err(ApiError::Conflict("Email already registered".to_string()));
                }
            }
        }

        let updates = UpdateUser {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
        };
        let record = store
            .update(id, updates)
            .await?
            .ok_or_else(|| not_found(id))?;

        info!(user_id = id, "User updated");
        Ok(record.into())
    }

    pub async fn delete(store: &dyn UserStore, id: i64) -> Result<i64, ApiError> {
        if !store.delete(id).await? {
            return Err(not_found(id));
        }
        info!(user_id = id, "User deleted");
        Ok(id)
    }

    /// Create the configured admin account unless its email is taken
    ///
    /// Every user endpoint sits behind the access gate, so a fresh
    /// deployment needs one account to log in with.
    pub async fn ensure_admin(
        store: &dyn UserStore,
        passwords: &PasswordService,
        admin: &AdminConfig,
    ) -> anyhow::Result<()> {
        if store.email_exists(&admin.email).await? {
            return Ok(());
        }

        let password_hash = passwords
            .hash_async(SecretString::new(admin.password.clone()))
            .await?;
        let record = store
            .insert(NewUser {
                first_name: admin.first_name.clone(),
                last_name: admin.last_name.clone(),
                email: admin.email.clone(),
                password_hash,
                is_admin: true,
            })
            .await?;

        info!(user_id = record.id, email = %record.email, "Admin user created");
        Ok(())
    }
}

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("User with {} not found", id))
}
