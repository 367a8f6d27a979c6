//! Postal address value object.
//!
//! Embedded in [`User`](crate::domain::User); it has no identity of its own
//! and is rebuilt from scratch on every user construction or update.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::shared::error::AppError;

/// Brazilian postal code (CEP), with or without the hyphen.
pub static POSTAL_CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{5}-?[0-9]{3}$").expect("postal code pattern is valid"));

/// Immutable postal address.
///
/// Every field except `complement` is mandatory. An empty complement is
/// stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    street: String,
    number: String,
    neighborhood: String,
    complement: Option<String>,
    city: String,
    state: String,
    postal_code: String,
}

impl Address {
    /// Build a validated address.
    pub fn new(
        street: impl Into<String>,
        number: impl Into<String>,
        neighborhood: impl Into<String>,
        complement: Option<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Result<Self, AppError> {
        let address = Self {
            street: street.into(),
            number: number.into(),
            neighborhood: neighborhood.into(),
            complement: complement.filter(|c| !c.is_empty()),
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
        };
        address.validate()?;
        Ok(address)
    }

    fn validate(&self) -> Result<(), AppError> {
        let required = [
            (&self.street, "Street is required"),
            (&self.number, "Number is required"),
            (&self.neighborhood, "Neighborhood is required"),
            (&self.city, "City is required"),
            (&self.state, "State is required"),
            (&self.postal_code, "CEP is required"),
        ];

        for (value, message) in required {
            if value.trim().is_empty() {
                return Err(AppError::Validation(message.into()));
            }
        }

        // Column widths of the users table
        let bounded = [
            ("Street", Some(self.street.as_str()), 255),
            ("Number", Some(self.number.as_str()), 20),
            ("Neighborhood", Some(self.neighborhood.as_str()), 255),
            ("Complement", self.complement.as_deref(), 255),
            ("City", Some(self.city.as_str()), 255),
            ("State", Some(self.state.as_str()), 50),
        ];

        for (field, value, max) in bounded {
            if value.is_some_and(|v| v.chars().count() > max) {
                return Err(AppError::Validation(format!(
                    "{} must be at most {} characters",
                    field, max
                )));
            }
        }

        if !POSTAL_CODE_PATTERN.is_match(&self.postal_code) {
            return Err(AppError::Validation("CEP is invalid".into()));
        }

        Ok(())
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn neighborhood(&self) -> &str {
        &self.neighborhood
    }

    pub fn complement(&self) -> Option<&str> {
        self.complement.as_deref()
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} - {}, {}/{} - {}",
            self.street, self.number, self.neighborhood, self.city, self.state, self.postal_code
        )
    }
}
