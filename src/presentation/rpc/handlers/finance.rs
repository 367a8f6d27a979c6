//! Finance service command handlers

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::IdPayload;
use crate::application::dto::{
    CreateFinanceDto, FinanceDto, ListFinancesByOwnerQuery, ListFinancesQuery, UpdateFinanceCommand,
};
use crate::application::use_cases::FinanceUseCases;
use crate::domain::{Finance, FinanceRepository};
use crate::presentation::rpc::dispatcher::{decode_payload, CommandDispatcher};
use crate::presentation::rpc::messages::Envelope;
use crate::shared::error::{AppError, UNKNOWN_COMMAND};

pub const FINANCE_DELETED: &str = "Finance record deleted successfully";

/// Command tags served by the finance service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinanceCommand {
    Create,
    Get,
    List,
    ListByOwner,
    Update,
    Delete,
}

impl FinanceCommand {
    pub const ALL: [FinanceCommand; 6] = [
        Self::Create,
        Self::Get,
        Self::List,
        Self::ListByOwner,
        Self::Update,
        Self::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create_finance",
            Self::Get => "get_finance",
            Self::List => "list_finances",
            Self::ListByOwner => "list_finances_by_owner",
            Self::Update => "update_finance",
            Self::Delete => "delete_finance",
        }
    }
}

impl FromStr for FinanceCommand {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("{} {}", UNKNOWN_COMMAND, s)))
    }
}

fn finance_list(records: Vec<Finance>) -> Vec<FinanceDto> {
    records.iter().map(FinanceDto::from).collect()
}

/// Dispatcher of the finance service.
pub struct FinanceDispatcher<R: FinanceRepository> {
    use_cases: FinanceUseCases<R>,
}

impl<R: FinanceRepository> FinanceDispatcher<R> {
    pub fn new(finance_repo: Arc<R>) -> Self {
        Self {
            use_cases: FinanceUseCases::new(finance_repo),
        }
    }

    async fn handle(&self, command: FinanceCommand, data: Value) -> Envelope {
        match command {
            FinanceCommand::Create => Envelope::from_result(self.create(data).await),
            FinanceCommand::Get => Envelope::from_result(self.get(data).await),
            FinanceCommand::List => Envelope::from_result(self.list(data).await),
            FinanceCommand::ListByOwner => Envelope::from_result(self.list_by_owner(data).await),
            FinanceCommand::Update => Envelope::from_result(self.update(data).await),
            FinanceCommand::Delete => Envelope::from_result(self.delete(data).await),
        }
    }

    async fn create(&self, data: Value) -> Result<FinanceDto, AppError> {
        let dto: CreateFinanceDto = decode_payload(data)?;
        let finance = self.use_cases.create.execute(dto).await?;
        Ok(FinanceDto::from(&finance))
    }

    async fn get(&self, data: Value) -> Result<FinanceDto, AppError> {
        let IdPayload { id } = decode_payload(data)?;
        let finance = self.use_cases.get.execute(id).await?;
        Ok(FinanceDto::from(&finance))
    }

    async fn list(&self, data: Value) -> Result<Vec<FinanceDto>, AppError> {
        let query: ListFinancesQuery = decode_payload(data)?;
        let records = self.use_cases.list.execute(query.include_deleted).await?;
        Ok(finance_list(records))
    }

    async fn list_by_owner(&self, data: Value) -> Result<Vec<FinanceDto>, AppError> {
        let query: ListFinancesByOwnerQuery = decode_payload(data)?;
        let records = self
            .use_cases
            .list_by_owner
            .execute(query.owner_id, query.include_deleted)
            .await?;
        Ok(finance_list(records))
    }

    async fn update(&self, data: Value) -> Result<FinanceDto, AppError> {
        let command: UpdateFinanceCommand = decode_payload(data)?;
        let finance = self.use_cases.update.execute(command.id, command.changes).await?;
        Ok(FinanceDto::from(&finance))
    }

    async fn delete(&self, data: Value) -> Result<Value, AppError> {
        let IdPayload { id } = decode_payload(data)?;
        self.use_cases.delete.execute(id).await?;
        Ok(json!({ "message": FINANCE_DELETED }))
    }
}

#[async_trait]
impl<R: FinanceRepository + 'static> CommandDispatcher for FinanceDispatcher<R> {
    fn service(&self) -> &'static str {
        "finance"
    }

    fn handles(&self, command: &str) -> bool {
        command.parse::<FinanceCommand>().is_ok()
    }

    async fn dispatch(&self, command: &str, data: Value) -> Envelope {
        let command = match command.parse::<FinanceCommand>() {
            Ok(cmd) => cmd,
            Err(e) => return Envelope::failure(&e),
        };

        let envelope = self.handle(command, data).await;
        if let Some(error) = &envelope.error {
            tracing::warn!(command = command.as_str(), error = %error, "Finance command failed");
        }
        envelope
    }
}
