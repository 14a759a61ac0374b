// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for source-map operations.

use thiserror::Error;

/// Errors that can occur while parsing a source map.
#[derive(Debug, Error)]
pub enum SourceMapError {
	#[error("invalid source map JSON: {0}")]
	InvalidJson(#[from] serde_json::Error),

	#[error("unsupported source map version: expected 3, got {0}")]
	UnsupportedVersion(u32),

	#[error("invalid base64 VLQ character: {0:?}")]
	InvalidVlqChar(char),

	#[error("VLQ segment ended inside a continuation")]
	UnterminatedVlq,

	#[error("VLQ value overflows 32 bits")]
	VlqOverflow,

	#[error("mapping segment has {0} fields, expected 1, 4 or 5")]
	MalformedSegment(usize),
}

/// Result type for source-map operations.
pub type Result<T> = std::result::Result<T, SourceMapError>;
