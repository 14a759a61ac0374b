// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Dispatch orchestration: one report through the whole pipeline.

use std::sync::Arc;

use tracing::{info, warn};

use kestrel_catcher_core::{ErrorEvent, Report};

use crate::compose::EventComposer;
use crate::error::{CatcherServerError, Result};
use crate::store::{EventStore, NotificationDispatcher, ProjectStore};

/// Sequences a report: authenticate → compose → persist → notify.
///
/// Per-report state machine:
/// `Received → Authenticated → Composed → Persisted → Notified`, with early
/// exits to access-denied after reception and to a persistence failure
/// after composition. A notification failure does not change the terminal
/// state; the transport still acknowledges the report.
pub struct DispatchOrchestrator {
	projects: Arc<dyn ProjectStore>,
	events: Arc<dyn EventStore>,
	notifier: Arc<dyn NotificationDispatcher>,
	composer: EventComposer,
}

impl DispatchOrchestrator {
	pub fn new(
		projects: Arc<dyn ProjectStore>,
		events: Arc<dyn EventStore>,
		notifier: Arc<dyn NotificationDispatcher>,
		composer: EventComposer,
	) -> Self {
		Self {
			projects,
			events,
			notifier,
			composer,
		}
	}

	/// Run one report to completion.
	///
	/// Returns the persisted event on success. Enrichment problems never
	/// surface here; they degrade inside composition.
	pub async fn dispatch(&self, report: Report) -> Result<ErrorEvent> {
		let project = self
			.projects
			.get_by_token(report.token())
			.await?
			.ok_or(CatcherServerError::AccessDenied)?;

		let event = self.composer.compose(&project, report).await;

		self.events
			.add(project.id, &event)
			.await
			.map_err(|e| CatcherServerError::Persistence(e.to_string()))?;

		// Best-effort: a notification failure must not fail the report or
		// roll back the persisted event.
		if let Err(e) = self.notifier.send(&project, &event).await {
			warn!(
				project_id = %project.id,
				error = %e,
				"notification dispatch failed"
			);
		}

		info!(
			project_id = %project.id,
			event_id = %event.id,
			family = %event.family,
			group_hash = %event.group_hash,
			"event persisted"
		);

		Ok(event)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::time::Duration;

	use kestrel_catcher_core::{
		ErrorLocation, Project, ProjectId, RawStack, ServerReport,
	};

	use crate::fetch::HttpArtifactFetcher;
	use crate::resolve::SourceResolver;
	use crate::store::{MemoryEventStore, MemoryProjectStore};

	struct FailingEventStore;

	#[async_trait]
	impl EventStore for FailingEventStore {
		async fn add(
			&self,
			_project_id: ProjectId,
			_event: &ErrorEvent,
		) -> Result<()> {
			Err(CatcherServerError::Persistence("disk full".to_string()))
		}
	}

	struct CountingNotifier {
		sent: AtomicUsize,
		fail: bool,
	}

	impl CountingNotifier {
		fn new(fail: bool) -> Self {
			Self {
				sent: AtomicUsize::new(0),
				fail,
			}
		}
	}

	#[async_trait]
	impl NotificationDispatcher for CountingNotifier {
		async fn send(&self, _project: &Project, _event: &ErrorEvent) -> Result<()> {
			self.sent.fetch_add(1, Ordering::SeqCst);
			if self.fail {
				Err(CatcherServerError::Notification("webhook down".to_string()))
			} else {
				Ok(())
			}
		}
	}

	fn composer() -> EventComposer {
		// The fetcher is never exercised: server reports have no
		// enrichment capability.
		EventComposer::new(Arc::new(SourceResolver::new(Arc::new(
			HttpArtifactFetcher::new(Duration::from_millis(100)),
		))))
	}

	fn server_report(token: &str) -> Report {
		Report::Server(ServerReport {
			token: token.to_string(),
			message: "fatal".to_string(),
			error_location: ErrorLocation {
				file: "app.py".to_string(),
				line: 7,
				col: 0,
				func: None,
				revision: None,
			},
			stack: RawStack::Absent,
			domain: None,
			time: 0,
		})
	}

	fn orchestrator(
		events: Arc<dyn EventStore>,
		notifier: Arc<dyn NotificationDispatcher>,
	) -> DispatchOrchestrator {
		let projects = Arc::new(MemoryProjectStore::new([Project::new(
			ProjectId::new(),
			"T1",
		)]));
		DispatchOrchestrator::new(projects, events, notifier, composer())
	}

	#[tokio::test]
	async fn unknown_token_is_access_denied_before_any_side_effect() {
		let events = Arc::new(MemoryEventStore::new());
		let notifier = Arc::new(CountingNotifier::new(false));
		let orchestrator = orchestrator(events.clone(), notifier.clone());

		let result = orchestrator.dispatch(server_report("wrong")).await;

		assert!(matches!(result, Err(CatcherServerError::AccessDenied)));
		assert_eq!(events.total().await, 0);
		assert_eq!(notifier.sent.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn valid_report_is_persisted_and_notified_exactly_once() {
		let events = Arc::new(MemoryEventStore::new());
		let notifier = Arc::new(CountingNotifier::new(false));
		let orchestrator = orchestrator(events.clone(), notifier.clone());

		let event = orchestrator.dispatch(server_report("T1")).await.unwrap();

		assert_eq!(events.total().await, 1);
		assert_eq!(notifier.sent.load(Ordering::SeqCst), 1);
		assert_eq!(event.message, "fatal");
	}

	#[tokio::test]
	async fn persistence_failure_is_fatal_and_skips_notification() {
		let notifier = Arc::new(CountingNotifier::new(false));
		let orchestrator = orchestrator(Arc::new(FailingEventStore), notifier.clone());

		let result = orchestrator.dispatch(server_report("T1")).await;

		assert!(matches!(result, Err(CatcherServerError::Persistence(_))));
		assert_eq!(notifier.sent.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn notification_failure_does_not_fail_the_report() {
		let events = Arc::new(MemoryEventStore::new());
		let notifier = Arc::new(CountingNotifier::new(true));
		let orchestrator = orchestrator(events.clone(), notifier.clone());

		let result = orchestrator.dispatch(server_report("T1")).await;

		assert!(result.is_ok());
		assert_eq!(events.total().await, 1);
		assert_eq!(notifier.sent.load(Ordering::SeqCst), 1);
	}
}
