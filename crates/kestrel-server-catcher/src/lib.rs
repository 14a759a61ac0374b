// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ingestion pipeline services for the Kestrel error catcher.
//!
//! This crate provides the server-side machinery between the transport
//! receivers and the external collaborators:
//!
//! - Store traits for project lookup, event persistence and notification
//!   dispatch, with in-memory implementations
//! - Source-artifact fetching over HTTP and a concurrent keyed artifact
//!   cache
//! - The event composer (normalize, remap, hash, detect, assemble)
//! - The dispatch orchestrator sequencing one report through the pipeline

pub mod compose;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod resolve;
pub mod store;

pub use compose::EventComposer;
pub use dispatch::DispatchOrchestrator;
pub use error::{CatcherServerError, Result};
pub use fetch::{HttpArtifactFetcher, SourceArtifactFetcher};
pub use resolve::{ArtifactKey, SourceArtifact, SourceResolver};
pub use store::{
	EventStore, LogNotifier, MemoryEventStore, MemoryProjectStore, NotificationDispatcher,
	ProjectStore,
};
