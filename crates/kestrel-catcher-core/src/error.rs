// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the catcher core.

use thiserror::Error;

/// Errors that can occur while interpreting report data.
#[derive(Debug, Error)]
pub enum CatcherError {
	#[error("malformed payload: {0}")]
	MalformedPayload(String),

	#[error("invalid runtime family: {0}")]
	InvalidRuntimeFamily(String),

	#[error("invalid severity: {0}")]
	InvalidSeverity(String),

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// Result type for catcher core operations.
pub type Result<T> = std::result::Result<T, CatcherError>;
