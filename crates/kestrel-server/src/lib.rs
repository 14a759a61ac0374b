// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP and WebSocket receivers for the Kestrel error catcher.
//!
//! Two transport surfaces feed the same dispatch pipeline:
//! - `GET /catcher/browser` upgrades to a persistent socket; each inbound
//!   text message is one browser-script report
//! - `POST /catcher/server` accepts one server-process report per request
//!   with status-only responses
//!
//! Receivers own authentication-by-token outcomes and acknowledgment
//! semantics; everything between reception and acknowledgment lives in
//! [`kestrel_server_catcher`].

pub mod config;
pub mod error;
pub mod routes;
pub mod ws;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use kestrel_server_catcher::DispatchOrchestrator;

pub use error::ServerError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub dispatcher: Arc<DispatchOrchestrator>,
}

impl AppState {
	pub fn new(dispatcher: Arc<DispatchOrchestrator>) -> Self {
		Self { dispatcher }
	}
}

/// Build the router over the receiver surfaces.
pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/catcher/server", post(routes::catcher::catch_server_report))
		.route("/catcher/browser", get(ws::ws_upgrade_handler))
		.with_state(state)
}
