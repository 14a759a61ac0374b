// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Grouping hashes for clustering occurrences of the same error.

use sha2::{Digest, Sha256};

/// Compute the grouping hash for a browser-script event.
///
/// The hash is a pure function of the message text alone, so two reports
/// with identical messages group together regardless of where they
/// originated.
pub fn group_hash_for_message(message: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(message.as_bytes());
	hex::encode(hasher.finalize())
}

/// Compute the grouping hash for a server-process event.
///
/// Server-process messages are often generic, so the hash is taken over the
/// `file:line` location string to preserve uniqueness.
pub fn group_hash_for_location(file: &str, line: u32) -> String {
	group_hash_for_message(&format!("{file}:{line}"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn identical_messages_group_together() {
		assert_eq!(
			group_hash_for_message("Cannot read property 'x' of undefined"),
			group_hash_for_message("Cannot read property 'x' of undefined"),
		);
	}

	#[test]
	fn different_messages_group_apart() {
		assert_ne!(
			group_hash_for_message("TypeError: a"),
			group_hash_for_message("TypeError: b"),
		);
	}

	#[test]
	fn location_hash_distinguishes_lines() {
		assert_ne!(
			group_hash_for_location("app.py", 10),
			group_hash_for_location("app.py", 11),
		);
	}

	#[test]
	fn hash_is_hex_sha256() {
		let hash = group_hash_for_message("boom");
		assert_eq!(hash.len(), 64);
		assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
	}

	proptest! {
		#[test]
		fn prop_hash_is_stable(message in ".*") {
			prop_assert_eq!(
				group_hash_for_message(&message),
				group_hash_for_message(&message)
			);
		}

		#[test]
		fn prop_location_hash_matches_joined_form(file in "[a-z./]{1,40}", line in 0u32..100_000) {
			prop_assert_eq!(
				group_hash_for_location(&file, line),
				group_hash_for_message(&format!("{file}:{line}"))
			);
		}
	}
}
