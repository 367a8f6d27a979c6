//! Finance command payloads and serialized view.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::domain::{Finance, Lifecycle};

/// `create_finance` payload.
///
/// Every field is optional at the wire level so that a missing value is
/// reported by the domain rules rather than by the decoder.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFinanceDto {
    #[serde(default, alias = "userId", alias = "user_id")]
    pub owner_id: Option<i64>,

    #[serde(default, alias = "valor", deserialize_with = "amount_number")]
    pub amount: Option<Decimal>,

    #[serde(default, alias = "descricao")]
    pub description: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFinanceDto {
    #[serde(default, alias = "valor", deserialize_with = "amount_number")]
    pub amount: Option<Decimal>,

    #[serde(default, alias = "descricao")]
    pub description: Option<String>,
}

/// Decode an amount that must be a JSON number; numeric strings are refused.
pub fn amount_number<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map(Some)
        .map_err(|_| de::Error::custom(format!("amount {} is out of range", text)))
}

/// `update_finance` payload: the id plus the changed fields, side by side.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateFinanceCommand {
    pub id: i64,

    #[serde(flatten)]
    pub changes: UpdateFinanceDto,
}

/// `list_finances` payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFinancesQuery {
    #[serde(default)]
    pub include_deleted: bool,
}

/// `list_finances_by_owner` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFinancesByOwnerQuery {
    #[serde(alias = "userId", alias = "user_id")]
    pub owner_id: i64,

    #[serde(default)]
    pub include_deleted: bool,
}

/// Serialized finance record as returned in envelopes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceDto {
    pub id: Option<i64>,
    pub owner_id: i64,
    pub amount: Decimal,
    pub description: String,
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

impl From<&Finance> for FinanceDto {
    fn from(finance: &Finance) -> Self {
        Self {
            id: finance.id(),
            owner_id: finance.owner_id(),
            amount: finance.amount(),
            description: finance.description().to_string(),
            lifecycle: finance.lifecycle().clone(),
        }
    }
}
