// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use std::fmt;

/// Error type shared across the bicseg crates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BicSegError {
    /// Caller-supplied data or configuration is malformed.
    InvalidInput(String),
    /// The input holds too few frames to segment at all.
    InsufficientData(String),
    /// A score became non-finite during a run.
    NumericalIssue(String),
}

impl BicSegError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::InsufficientData(message.into())
    }

    pub fn numerical_issue(message: impl Into<String>) -> Self {
        Self::NumericalIssue(message.into())
    }
}

impl fmt::Display for BicSegError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(message)
            | Self::InsufficientData(message)
            | Self::NumericalIssue(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for BicSegError {}
