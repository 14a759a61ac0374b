// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Persistent-socket receiver for browser-script reports.
//!
//! Each inbound text message is an independent unit of work: it is decoded,
//! dispatched and acknowledged on its own task, so a slow source-map fetch
//! for one message never blocks the next, and closing the connection cancels
//! no in-flight work. The only reply traffic is error replies; a processed
//! report is acknowledged by silence.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use kestrel_catcher_core::{BrowserReport, Report};
use kestrel_server_catcher::CatcherServerError;

use crate::AppState;

/// Reply sent when the report's token resolves to no project. The
/// connection is closed afterwards.
pub const ERR_ACCESS_DENIED: &str = "Access denied";
/// Reply sent for every other failure. The connection stays open.
pub const ERR_INTERNAL: &str = "Unsuccessful error catching";

/// Outbound reply queue depth per connection.
const MAX_QUEUE_SIZE: usize = 64;

/// Error reply message on the socket protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
	#[serde(rename = "type")]
	pub kind: String,
	pub message: String,
}

impl ErrorReply {
	fn new(message: &str) -> Self {
		Self {
			kind: "error".to_string(),
			message: message.to_string(),
		}
	}
}

/// What one processed message asks the connection to do.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum MessageOutcome {
	/// Report accepted; no reply traffic.
	Accepted,
	/// Send an error reply, optionally closing the connection.
	Reply { message: &'static str, close: bool },
}

/// GET /catcher/browser - upgrade to the persistent-socket receiver.
pub async fn ws_upgrade_handler(
	ws: WebSocketUpgrade,
	State(state): State<AppState>,
) -> impl IntoResponse {
	ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection(socket: WebSocket, state: AppState) {
	let (mut sender, mut receiver) = socket.split();
	let (tx, mut rx) = mpsc::channel::<Message>(MAX_QUEUE_SIZE);

	let send_task = tokio::spawn(async move {
		while let Some(msg) = rx.recv().await {
			let closing = matches!(msg, Message::Close(_));
			if let Err(e) = sender.send(msg).await {
				debug!(error = %e, "failed to send socket reply");
				break;
			}
			if closing {
				break;
			}
		}
	});

	loop {
		let msg = match receiver.next().await {
			Some(Ok(msg)) => msg,
			Some(Err(e)) => {
				// Transport-level errors are logged, never propagated;
				// the listener must survive misbehaving clients.
				warn!(error = %e, "socket receiver error");
				break;
			}
			None => break,
		};

		match msg {
			Message::Text(text) => {
				let state = state.clone();
				let tx = tx.clone();
				tokio::spawn(async move {
					let text = text.to_string();
					let outcome = process_message(&state, &text).await;
					deliver_outcome(outcome, &tx).await;
				});
			}
			Message::Close(_) => break,
			// Pings are answered by axum; binary traffic is not part of
			// the catcher protocol.
			_ => {}
		}
	}

	drop(tx);
	let _ = send_task.await;
	debug!("socket connection finished");
}

/// Run one socket message through the pipeline and decide the reply.
pub(crate) async fn process_message(state: &AppState, text: &str) -> MessageOutcome {
	let report: BrowserReport = match serde_json::from_str(text) {
		Ok(report) => report,
		Err(e) => {
			warn!(error = %e, "browser report decode failed");
			return MessageOutcome::Reply {
				message: ERR_INTERNAL,
				close: false,
			};
		}
	};

	info!(
		host = report.location.display_host(),
		"got browser error"
	);

	match state.dispatcher.dispatch(Report::Browser(report)).await {
		Ok(_) => MessageOutcome::Accepted,
		Err(CatcherServerError::AccessDenied) => MessageOutcome::Reply {
			message: ERR_ACCESS_DENIED,
			close: true,
		},
		Err(e) => {
			error!(error = %e, "browser report handling failed");
			MessageOutcome::Reply {
				message: ERR_INTERNAL,
				close: false,
			}
		}
	}
}

async fn deliver_outcome(outcome: MessageOutcome, tx: &mpsc::Sender<Message>) {
	let MessageOutcome::Reply { message, close } = outcome else {
		return;
	};

	if let Ok(json) = serde_json::to_string(&ErrorReply::new(message)) {
		let _ = tx.send(Message::Text(json.into())).await;
	}
	if close {
		let _ = tx.send(Message::Close(None)).await;
	}
}
