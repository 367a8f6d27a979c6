//! User command payloads and serialized view.

use serde::{Deserialize, Serialize};

use crate::domain::{Lifecycle, User, UserStatus};

/// Page size used when `list_users` gets no usable `limit`.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// `create_user` payload.
///
/// Missing fields decode to `None` and are reported by the domain rules.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    #[serde(default, alias = "nome")]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default, alias = "rua")]
    pub street: Option<String>,

    #[serde(default, alias = "numero")]
    pub number: Option<String>,

    #[serde(default, alias = "bairro")]
    pub neighborhood: Option<String>,

    #[serde(default, alias = "complemento")]
    pub complement: Option<String>,

    #[serde(default, alias = "cidade")]
    pub city: Option<String>,

    #[serde(default, alias = "estado")]
    pub state: Option<String>,

    #[serde(default, alias = "postalCode")]
    pub cep: Option<String>,

    #[serde(default)]
    pub status: Option<UserStatus>,
}

/// Partial update; absent fields keep their stored value.
///
/// Same shape as [`CreateUserDto`], kept separate because the two evolve
/// independently.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[serde(default, alias = "nome")]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default, alias = "rua")]
    pub street: Option<String>,

    #[serde(default, alias = "numero")]
    pub number: Option<String>,

    #[serde(default, alias = "bairro")]
    pub neighborhood: Option<String>,

    #[serde(default, alias = "complemento")]
    pub complement: Option<String>,

    #[serde(default, alias = "cidade")]
    pub city: Option<String>,

    #[serde(default, alias = "estado")]
    pub state: Option<String>,

    #[serde(default, alias = "postalCode")]
    pub cep: Option<String>,

    #[serde(default)]
    pub status: Option<UserStatus>,
}

/// `update_user` payload: the id plus the changed fields, side by side.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserCommand {
    pub id: i64,

    #[serde(flatten)]
    pub changes: UpdateUserDto,
}

/// `list_users` payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    #[serde(default)]
    pub include_deleted: bool,

    #[serde(default)]
    pub page: Option<i64>,

    #[serde(default)]
    pub limit: Option<i64>,

    #[serde(default)]
    pub search: Option<String>,
}

/// Paging metadata carried next to `data` in the `list_users` envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

impl Pagination {
    /// Resolve requested paging against `total` matching rows.
    ///
    /// Missing or non-positive values fall back to page 1 and
    /// [`DEFAULT_PAGE_SIZE`].
    pub fn new(total: usize, page: Option<i64>, limit: Option<i64>) -> Self {
        let page = positive(page).unwrap_or(1);
        let limit = positive(limit).unwrap_or(DEFAULT_PAGE_SIZE);

        Self {
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit),
        }
    }

    /// Index of the first row on this page.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn positive(value: Option<i64>) -> Option<usize> {
    value
        .filter(|v| *v >= 1)
        .and_then(|v| usize::try_from(v).ok())
}

/// One page of users plus its metadata.
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<User>,
    pub pagination: Pagination,
}

/// Serialized user as returned in envelopes; the address is flattened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub street: String,
    pub number: String,
    pub neighborhood: String,
    pub complement: Option<String>,
    pub city: String,
    pub state: String,
    pub cep: String,
    pub status: UserStatus,
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        let address = user.address();
        Self {
            id: user.id(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            street: address.street().to_string(),
            number: address.number().to_string(),
            neighborhood: address.neighborhood().to_string(),
            complement: address.complement().map(str::to_string),
            city: address.city().to_string(),
            state: address.state().to_string(),
            cep: address.postal_code().to_string(),
            status: user.status(),
            lifecycle: user.lifecycle().clone(),
        }
    }
}
