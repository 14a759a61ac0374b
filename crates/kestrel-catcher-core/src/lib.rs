// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Kestrel error catcher.
//!
//! This crate provides the shared vocabulary of the ingestion pipeline:
//! incoming reports, normalized stack frames, composed error events, client
//! context, grouping hashes, and the error taxonomy. It is consumed by the
//! enrichment services (`kestrel-server-catcher`) and the transport surface
//! (`kestrel-server`).
//!
//! # Overview
//!
//! The catcher accepts two report families:
//! - Browser-script reports, delivered over a persistent socket, which carry
//!   a raw stack, a page location and navigator facts and are eligible for
//!   source-map enrichment
//! - Server-process reports, delivered request/response, which carry a direct
//!   error location and no enrichment capability
//!
//! Both are normalized into the immutable [`ErrorEvent`] record.

pub mod context;
pub mod error;
pub mod event;
pub mod group;
pub mod project;
pub mod report;
pub mod stack;

pub use context::{BrowserFacts, Capability, ClientInfo, DeviceClass, DeviceFacts};
pub use error::{CatcherError, Result};
pub use event::{ErrorEvent, RuntimeFamily, Severity, StackFrame};
pub use group::{group_hash_for_location, group_hash_for_message};
pub use project::Project;
pub use report::{
	BrowserReport, ErrorLocation, NavigatorInfo, PageLocation, RawStack, RawStackEntry, Report,
	ServerReport, ViewportFrame,
};
pub use stack::normalize_stack;

use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Project ID (owner of incoming reports, resolved by token).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ProjectId(pub Uuid);

impl ProjectId {
	pub fn new() -> Self {
		Self(Uuid::now_v7())
	}
}

impl Default for ProjectId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for ProjectId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for ProjectId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

/// Event ID (assigned once per accepted report).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
	pub fn new() -> Self {
		Self(Uuid::now_v7())
	}
}

impl Default for EventId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for EventId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for EventId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	proptest! {
		#[test]
		fn project_id_roundtrip(uuid_bytes in any::<[u8; 16]>()) {
			let uuid = Uuid::from_bytes(uuid_bytes);
			let id = ProjectId(uuid);
			let s = id.to_string();
			let parsed: ProjectId = s.parse().unwrap();
			prop_assert_eq!(id, parsed);
		}

		#[test]
		fn event_id_roundtrip(uuid_bytes in any::<[u8; 16]>()) {
			let uuid = Uuid::from_bytes(uuid_bytes);
			let id = EventId(uuid);
			let s = id.to_string();
			let parsed: EventId = s.parse().unwrap();
			prop_assert_eq!(id, parsed);
		}
	}
}
