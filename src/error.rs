// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures talking to the finance backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Network, timeout or TLS failure before a response was read.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Non-success HTTP status without a decodable envelope.
    #[error("Backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The envelope said `success: false`. The message is user-facing.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Body could not be decoded into the expected envelope.
    #[error("Malformed response: {message}")]
    Decode { message: String },
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::Transport {
            message: error.to_string(),
        }
    }
}

impl ApiError {
    pub fn transport(message: &str) -> Self {
        ApiError::Transport {
            message: message.to_string(),
        }
    }

    /// Message fit to show to the user, if the backend supplied one.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

/// Failures of the view model that never reach the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    #[error("Recurrence interval must be at least 1")]
    ZeroInterval,

    #[error("No record is selected")]
    NothingSelected,

    #[error("No form is open")]
    NoForm,

    #[error("Invalid record id '{0}'")]
    InvalidId(String),
}

/// Failures of the camera behind a capture scan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("Camera unavailable: {0}")]
    Unavailable(String),

    #[error("Frame capture failed: {0}")]
    Frame(String),

    #[error("Scan interval must be greater than zero")]
    ZeroInterval,
}
