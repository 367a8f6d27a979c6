//! User use-cases

use std::sync::Arc;

use crate::application::dto::{CreateUserDto, ListUsersQuery, Pagination, UpdateUserDto, UserPage};
use crate::domain::{Address, User, UserRepository};
use crate::shared::error::AppError;

pub const EMAIL_ALREADY_REGISTERED: &str = "Email already registered";

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("User with ID {} not found", id))
}

/// Load a user that exists and is not soft-deleted.
async fn find_live<R: UserRepository>(repo: &R, id: i64) -> Result<User, AppError> {
    match repo.find_by_id(id).await? {
        Some(user) if !user.is_deleted() => Ok(user),
        _ => Err(not_found(id)),
    }
}

/// Fail when a live user other than `owner` already holds `email`.
async fn ensure_email_free<R: UserRepository>(
    repo: &R,
    email: &str,
    owner: Option<i64>,
) -> Result<(), AppError> {
    match repo.find_by_email(email).await? {
        Some(existing) if !existing.is_deleted() && existing.id() != owner => {
            Err(AppError::Conflict(EMAIL_ALREADY_REGISTERED.into()))
        }
        _ => Ok(()),
    }
}

pub struct CreateUser<R: UserRepository> {
    user_repo: Arc<R>,
}

impl<R: UserRepository> CreateUser<R> {
    pub fn new(user_repo: Arc<R>) -> Self {
        Self { user_repo }
    }

    /// Validate, check the email is free, then persist.
    pub async fn execute(&self, dto: CreateUserDto) -> Result<User, AppError> {
        let address = Address::new(
            dto.street.unwrap_or_default(),
            dto.number.unwrap_or_default(),
            dto.neighborhood.unwrap_or_default(),
            dto.complement,
            dto.city.unwrap_or_default(),
            dto.state.unwrap_or_default(),
            dto.cep.unwrap_or_default(),
        )?;
        let user = User::create(
            dto.name.unwrap_or_default(),
            dto.email.unwrap_or_default(),
            address,
            dto.status.unwrap_or_default(),
        )?;

        ensure_email_free(self.user_repo.as_ref(), user.email(), None).await?;

        let created = self.user_repo.create(&user).await?;
        tracing::info!(user_id = ?created.id(), "User created");
        Ok(created)
    }
}

pub struct GetUser<R: UserRepository> {
    user_repo: Arc<R>,
}

impl<R: UserRepository> GetUser<R> {
    pub fn new(user_repo: Arc<R>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, id: i64) -> Result<User, AppError> {
        find_live(self.user_repo.as_ref(), id).await
    }
}

pub struct ListUsers<R: UserRepository> {
    user_repo: Arc<R>,
}

impl<R: UserRepository> ListUsers<R> {
    pub fn new(user_repo: Arc<R>) -> Self {
        Self { user_repo }
    }

    /// Load every user, then filter by `search` and cut the requested page.
    pub async fn execute(&self, query: ListUsersQuery) -> Result<UserPage, AppError> {
        let mut users = self.user_repo.find_all(query.include_deleted).await?;

        if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            users.retain(|user| {
                user.name().to_lowercase().contains(&term)
                    || user.email().to_lowercase().contains(&term)
            });
        }

        let pagination = Pagination::new(users.len(), query.page, query.limit);
        let users = users
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.limit)
            .collect();

        Ok(UserPage { users, pagination })
    }
}

pub struct UpdateUser<R: UserRepository> {
    user_repo: Arc<R>,
}

impl<R: UserRepository> UpdateUser<R> {
    pub fn new(user_repo: Arc<R>) -> Self {
        Self { user_repo }
    }

    /// Merge the present fields over the stored user and persist it.
    pub async fn execute(&self, id: i64, dto: UpdateUserDto) -> Result<User, AppError> {
        let mut user = find_live(self.user_repo.as_ref(), id).await?;

        let current = user.address();
        let address = Address::new(
            dto.street.unwrap_or_else(|| current.street().to_string()),
            dto.number.unwrap_or_else(|| current.number().to_string()),
            dto.neighborhood
                .unwrap_or_else(|| current.neighborhood().to_string()),
            dto.complement.or_else(|| current.complement().map(str::to_string)),
            dto.city.unwrap_or_else(|| current.city().to_string()),
            dto.state.unwrap_or_else(|| current.state().to_string()),
            dto.cep.unwrap_or_else(|| current.postal_code().to_string()),
        )?;

        if let Some(email) = dto.email.as_deref().filter(|e| *e != user.email()) {
            ensure_email_free(self.user_repo.as_ref(), email, Some(id)).await?;
        }

        let name = dto.name.unwrap_or_else(|| user.name().to_string());
        let email = dto.email.unwrap_or_else(|| user.email().to_string());
        let status = dto.status.unwrap_or(user.status());
        user.update_info(name, email, address, status)?;

        let updated = self.user_repo.update(id, &user).await?;
        tracing::info!(user_id = id, "User updated");
        Ok(updated)
    }
}

pub struct DeleteUser<R: UserRepository> {
    user_repo: Arc<R>,
}

impl<R: UserRepository> DeleteUser<R> {
    pub fn new(user_repo: Arc<R>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, id: i64) -> Result<(), AppError> {
        find_live(self.user_repo.as_ref(), id).await?;
        self.user_repo.soft_delete(id).await?;
        tracing::info!(user_id = id, "User soft-deleted");
        Ok(())
    }
}

/// Every user use-case, sharing one repository.
pub struct UserUseCases<R: UserRepository> {
    pub create: CreateUser<R>,
    pub get: GetUser<R>,
    pub list: ListUsers<R>,
    pub update: UpdateUser<R>,
    pub delete: DeleteUser<R>,
}

impl<R: UserRepository> UserUseCases<R> {
    pub fn new(user_repo: Arc<R>) -> Self {
        Self {
            create: CreateUser::new(user_repo.clone()),
            get: GetUser::new(user_repo.clone()),
            list: ListUsers::new(user_repo.clone()),
            update: UpdateUser::new(user_repo.clone()),
            delete: DeleteUser::new(user_repo),
        }
    }
}
