//! Data Transfer Objects
//!
//! - **finance** / **user**: command payloads decoded by the backend
//!   services and the serialized views they return
//! - **request**: validated gateway request bodies and query strings

pub mod finance;
pub mod request;
pub mod user;

pub use finance::{
    CreateFinanceDto, FinanceDto, ListFinancesByOwnerQuery, ListFinancesQuery,
    UpdateFinanceCommand, UpdateFinanceDto,
};
pub use request::{
    CreateFinanceRequest, CreateUserRequest, IncludeDeletedParams, ListUsersParams,
    UpdateFinanceRequest, UpdateUserRequest,
};
pub use user::{
    CreateUserDto, ListUsersQuery, Pagination, UpdateUserCommand, UpdateUserDto, UserDto,
    UserPage, DEFAULT_PAGE_SIZE,
};
