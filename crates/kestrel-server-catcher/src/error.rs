// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the ingestion pipeline.
//!
//! The taxonomy mirrors the pipeline's propagation policy: access-denied and
//! persistence failures surface to the transport boundary, enrichment
//! unavailability never appears here at all (it degrades in place), and
//! notification failures are logged and swallowed by the orchestrator.

use thiserror::Error;

/// Errors that can occur while dispatching a report.
#[derive(Debug, Error)]
pub enum CatcherServerError {
	/// Token does not resolve to a project. Terminal for the report.
	#[error("access denied")]
	AccessDenied,

	/// Input could not be parsed into a report.
	#[error("malformed payload: {0}")]
	MalformedPayload(String),

	/// The event store rejected the write. Fatal to the report.
	#[error("persistence failure: {0}")]
	Persistence(String),

	/// The notification dispatcher failed. Logged, never propagated past
	/// the orchestrator.
	#[error("notification failure: {0}")]
	Notification(String),

	/// Project store lookup failed.
	#[error("project store failure: {0}")]
	ProjectStore(String),

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// Result type for ingestion pipeline operations.
pub type Result<T> = std::result::Result<T, CatcherServerError>;
