// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! External collaborator traits and in-memory implementations.
//!
//! Project management, event persistence and notification delivery live
//! outside this pipeline; these traits are the whole surface the pipeline
//! consumes. The in-memory implementations back tests and single-process
//! deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use kestrel_catcher_core::{ErrorEvent, Project, ProjectId};

use crate::error::Result;

/// Project lookup by ingest token.
#[async_trait]
pub trait ProjectStore: Send + Sync {
	async fn get_by_token(&self, token: &str) -> Result<Option<Project>>;
}

/// Event persistence, keyed by owning project.
#[async_trait]
pub trait EventStore: Send + Sync {
	async fn add(&self, project_id: ProjectId, event: &ErrorEvent) -> Result<()>;
}

/// Best-effort notification delivery for a persisted event.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
	async fn send(&self, project: &Project, event: &ErrorEvent) -> Result<()>;
}

/// In-memory project store seeded at startup.
#[derive(Debug, Default, Clone)]
pub struct MemoryProjectStore {
	by_token: HashMap<String, Project>,
}

impl MemoryProjectStore {
	pub fn new(projects: impl IntoIterator<Item = Project>) -> Self {
		Self {
			by_token: projects
				.into_iter()
				.map(|p| (p.token.clone(), p))
				.collect(),
		}
	}

	pub fn len(&self) -> usize {
		self.by_token.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_token.is_empty()
	}
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
	async fn get_by_token(&self, token: &str) -> Result<Option<Project>> {
		Ok(self.by_token.get(token).cloned())
	}
}

/// In-memory event store.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
	events: RwLock<HashMap<ProjectId, Vec<ErrorEvent>>>,
}

impl MemoryEventStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Events persisted for one project, in arrival order.
	pub async fn events_for(&self, project_id: ProjectId) -> Vec<ErrorEvent> {
		self.events
			.read()
			.await
			.get(&project_id)
			.cloned()
			.unwrap_or_default()
	}

	pub async fn total(&self) -> usize {
		self.events.read().await.values().map(Vec::len).sum()
	}
}

#[async_trait]
impl EventStore for MemoryEventStore {
	async fn add(&self, project_id: ProjectId, event: &ErrorEvent) -> Result<()> {
		self.events
			.write()
			.await
			.entry(project_id)
			.or_default()
			.push(event.clone());
		Ok(())
	}
}

/// Notification dispatcher that records deliveries in the log.
///
/// Stands in until a real transport (mail, chat webhook) is wired up;
/// deployments provide their own [`NotificationDispatcher`].
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl NotificationDispatcher for LogNotifier {
	async fn send(&self, project: &Project, event: &ErrorEvent) -> Result<()> {
		info!(
			project_id = %project.id,
			group_hash = %event.group_hash,
			severity = %event.severity,
			"notification: {}",
			event.message
		);
		Ok(())
	}
}

pub type SharedProjectStore = Arc<dyn ProjectStore>;
pub type SharedEventStore = Arc<dyn EventStore>;
pub type SharedNotificationDispatcher = Arc<dyn NotificationDispatcher>;

#[cfg(test)]
mod tests {
	use super::*;
	use kestrel_catcher_core::{
		ErrorLocation, EventId, RuntimeFamily, Severity,
	};

	fn sample_event(message: &str) -> ErrorEvent {
		ErrorEvent {
			id: EventId::new(),
			family: RuntimeFamily::ServerProcess,
			severity: Severity::Fatal,
			message: message.to_string(),
			error_location: ErrorLocation {
				file: "app.py".to_string(),
				line: 1,
				col: 0,
				func: None,
				revision: None,
			},
			location: None,
			group_hash: kestrel_catcher_core::group_hash_for_message(message),
			stack: Vec::new(),
			client: None,
			time: 0,
		}
	}

	#[tokio::test]
	async fn project_store_resolves_known_token() {
		let project = Project::new(ProjectId::new(), "T1");
		let store = MemoryProjectStore::new([project.clone()]);

		let found = store.get_by_token("T1").await.unwrap();
		assert_eq!(found, Some(project));
	}

	#[tokio::test]
	async fn project_store_misses_unknown_token() {
		let store = MemoryProjectStore::new([]);
		assert_eq!(store.get_by_token("nope").await.unwrap(), None);
	}

	#[tokio::test]
	async fn event_store_keeps_arrival_order_per_project() {
		let store = MemoryEventStore::new();
		let project_id = ProjectId::new();

		store.add(project_id, &sample_event("first")).await.unwrap();
		store.add(project_id, &sample_event("second")).await.unwrap();

		let events = store.events_for(project_id).await;
		assert_eq!(events.len(), 2);
		assert_eq!(events[0].message, "first");
		assert_eq!(events[1].message, "second");
	}
}
