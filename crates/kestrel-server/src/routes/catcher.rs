// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request/response receiver for server-process reports.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use kestrel_catcher_core::{Report, ServerReport};

use crate::error::ServerError;
use crate::AppState;

/// POST /catcher/server - accept one server-process report.
///
/// Status-only responses: success carries no body, an unknown token is a
/// client error, any composition or persistence failure is a server error.
pub async fn catch_server_report(
	State(state): State<AppState>,
	Json(report): Json<ServerReport>,
) -> Result<StatusCode, ServerError> {
	info!(
		host = report.domain.as_deref().unwrap_or("unknown"),
		"got server-process error"
	);

	state.dispatcher.dispatch(Report::Server(report)).await?;
	Ok(StatusCode::NO_CONTENT)
}
