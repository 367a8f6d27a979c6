//! Users service command handlers

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::IdPayload;
use crate::application::dto::{CreateUserDto, ListUsersQuery, Pagination, UpdateUserCommand, UserDto};
use crate::application::use_cases::UserUseCases;
use crate::domain::UserRepository;
use crate::presentation::rpc::dispatcher::{decode_payload, CommandDispatcher};
use crate::presentation::rpc::messages::Envelope;
use crate::shared::error::{AppError, UNKNOWN_COMMAND};

pub const USER_DELETED: &str = "User deleted successfully";

/// Command tags served by the users service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Create,
    Get,
    List,
    Update,
    Delete,
}

impl UserCommand {
    pub const ALL: [UserCommand; 5] = [
        Self::Create,
        Self::Get,
        Self::List,
        Self::Update,
        Self::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create_user",
            Self::Get => "get_user",
            Self::List => "list_users",
            Self::Update => "update_user",
            Self::Delete => "delete_user",
        }
    }
}

impl FromStr for UserCommand {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("{} {}", UNKNOWN_COMMAND, s)))
    }
}

/// Dispatcher of the users service.
pub struct UserDispatcher<R: UserRepository> {
    use_cases: UserUseCases<R>,
}

impl<R: UserRepository> UserDispatcher<R> {
    pub fn new(user_repo: Arc<R>) -> Self {
        Self {
            use_cases: UserUseCases::new(user_repo),
        }
    }

    async fn handle(&self, command: UserCommand, data: Value) -> Envelope {
        match command {
            UserCommand::Create => Envelope::from_result(self.create(data).await),
            UserCommand::Get => Envelope::from_result(self.get(data).await),
            UserCommand::List => match self.list(data).await {
                Ok((users, pagination)) => {
                    Envelope::from_result(Ok(users)).with_pagination(pagination)
                }
                Err(e) => Envelope::failure(&e),
            },
            UserCommand::Update => Envelope::from_result(self.update(data).await),
            UserCommand::Delete => Envelope::from_result(self.delete(data).await),
        }
    }

    async fn create(&self, data: Value) -> Result<UserDto, AppError> {
        let dto: CreateUserDto = decode_payload(data)?;
        let user = self.use_cases.create.execute(dto).await?;
        Ok(UserDto::from(&user))
    }

    async fn get(&self, data: Value) -> Result<UserDto, AppError> {
        let IdPayload { id } = decode_payload(data)?;
        let user = self.use_cases.get.execute(id).await?;
        Ok(UserDto::from(&user))
    }

    async fn list(&self, data: Value) -> Result<(Vec<UserDto>, Pagination), AppError> {
        let query: ListUsersQuery = decode_payload(data)?;
        let page = self.use_cases.list.execute(query).await?;
        let users = page.users.iter().map(UserDto::from).collect();
        Ok((users, page.pagination))
    }

    async fn update(&self, data: Value) -> Result<UserDto, AppError> {
        let command: UpdateUserCommand = decode_payload(data)?;
        let user = self.use_cases.update.execute(command.id, command.changes).await?;
        Ok(UserDto::from(&user))
    }

    async fn delete(&self, data: Value) -> Result<Value, AppError> {
        let IdPayload { id } = decode_payload(data)?;
        self.use_cases.delete.execute(id).await?;
        Ok(json!({ "message": USER_DELETED }))
    }
}

#[async_trait]
impl<R: UserRepository + 'static> CommandDispatcher for UserDispatcher<R> {
    fn service(&self) -> &'static str {
        "users"
    }

    fn handles(&self, command: &str) -> bool {
        command.parse::<UserCommand>().is_ok()
    }

    async fn dispatch(&self, command: &str, data: Value) -> Envelope {
        let command = match command.parse::<UserCommand>() {
            Ok(cmd) => cmd,
            Err(e) => return Envelope::failure(&e),
        };

        let envelope = self.handle(command, data).await;
        if let Some(error) = &envelope.error {
            tracing::warn!(command = command.as_str(), error = %error, "User command failed");
        }
        envelope
    }
}
