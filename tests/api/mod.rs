//! API Tests

mod channel_tests;
mod finance_tests;
mod gateway_tests;
mod user_tests;
