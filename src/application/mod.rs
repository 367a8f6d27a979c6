//! Application Layer
//!
//! Contains the use-cases and data transfer objects (DTOs).
//! This layer orchestrates the flow of data between the presentation
//! and domain layers.

pub mod dto;
pub mod use_cases;
