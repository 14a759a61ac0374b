// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Transport-level error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use kestrel_server_catcher::CatcherServerError;

/// Errors surfaced at the request/response boundary.
///
/// Responses are status-only: a bad token is a client error, everything
/// else is a server error, and no body leaks pipeline internals.
#[derive(Debug, Error)]
pub enum ServerError {
	#[error("access denied")]
	AccessDenied,

	#[error("internal error: {0}")]
	Internal(String),
}

impl From<CatcherServerError> for ServerError {
	fn from(e: CatcherServerError) -> Self {
		match e {
			CatcherServerError::AccessDenied => ServerError::AccessDenied,
			other => ServerError::Internal(other.to_string()),
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		match self {
			ServerError::AccessDenied => StatusCode::FORBIDDEN.into_response(),
			ServerError::Internal(reason) => {
				error!(reason = %reason, "request failed");
				StatusCode::INTERNAL_SERVER_ERROR.into_response()
			}
		}
	}
}
