// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use thiserror::Error;

/// Everything that can go wrong between picking a command and logging it.
///
/// Every variant is recoverable at the request boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("missing parameter '{0}'")]
    MissingParameter(String),

    #[error("parameter '{param}': '{value}' is not one of the allowed options")]
    InvalidOption { param: String, value: String },

    #[error("parameter '{param}': '{value}' is not a number")]
    InvalidNumber { param: String, value: String },

    #[error("parameter '{param}': '{value}' is not a boolean")]
    InvalidBoolean { param: String, value: String },

    #[error("message is empty")]
    EmptyMessage,

    #[error("message is {length} bytes, exceeds the {limit}-byte limit")]
    MessageTooLong { length: usize, limit: usize },

    #[error("phone number is required")]
    EmptyDestination,

    #[error("failed to record submission: {0}")]
    PersistenceFailure(String),
}

impl ComposeError {
    /// Stable machine-readable identifier, used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            ComposeError::UnknownCommand(_) => "unknown_command",
            ComposeError::MissingParameter(_) => "missing_parameter",
            ComposeError::InvalidOption { .. } => "invalid_option",
            ComposeError::InvalidNumber { .. } => "invalid_number",
            ComposeError::InvalidBoolean { .. } => "invalid_boolean",
            ComposeError::EmptyMessage => "empty_message",
            ComposeError::MessageTooLong { .. } => "message_too_long",
            ComposeError::EmptyDestination => "empty_destination",
            ComposeError::PersistenceFailure(_) => "persistence_failure",
        }
    }

    /// Name of the offending parameter, for parameter-level errors.
    pub fn param(&self) -> Option<&str> {
        match self {
            ComposeError::MissingParameter(param) => Some(param),
            ComposeError::InvalidOption { param, .. }
            | ComposeError::InvalidNumber { param, .. }
            | ComposeError::InvalidBoolean { param, .. } => Some(param),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct_for_rejection_and_persistence() {
        let too_long = ComposeError::MessageTooLong {
            length: 151,
            limit: 150,
        };
        let persist = ComposeError::PersistenceFailure("disk full".into());
        assert_ne!(too_long.code(), persist.code());
        assert_eq!(persist.code(), "persistence_failure");
    }

    #[test]
    fn test_param_is_reported_for_field_errors_only() {
        let err = ComposeError::InvalidOption {
            param: "sms".into(),
            value: "7".into(),
        };
        assert_eq!(err.param(), Some("sms"));
        assert_eq!(ComposeError::EmptyDestination.param(), None);
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ComposeError::UnknownCommand("nope".into()).to_string(),
            "unknown command 'nope'"
        );
        assert_eq!(
            ComposeError::MessageTooLong {
                length: 200,
                limit: 150
            }
            .to_string(),
            "message is 200 bytes, exceeds the 150-byte limit"
        );
    }
}
