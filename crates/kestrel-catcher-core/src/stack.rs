// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack normalization.
//!
//! Parses the runtime-specific raw stack of an incoming report into an
//! ordered sequence of [`StackFrame`]s. This is the single seam that absorbs
//! per-runtime variance; downstream components only ever see `StackFrame`.
//!
//! The transformation is pure and order-preserving: the Nth raw entry maps
//! to the Nth output frame, and absent fields stay absent.

use crate::event::StackFrame;
use crate::report::{RawStack, RawStackEntry};

/// Normalize a raw stack into ordered frames.
pub fn normalize_stack(raw: &RawStack) -> Vec<StackFrame> {
	match raw {
		RawStack::Entries(entries) => entries.iter().map(normalize_entry).collect(),
		RawStack::Text(text) => parse_text_stack(text),
		RawStack::Absent => Vec::new(),
	}
}

fn normalize_entry(entry: &RawStackEntry) -> StackFrame {
	StackFrame {
		func: entry.func.clone().filter(|f| !f.is_empty()),
		file: entry.file.clone().filter(|f| !f.is_empty()),
		line: entry.line,
		col: entry.col,
	}
}

/// Parse an `Error.stack` text blob into frames.
///
/// Handles the two shapes browsers emit:
/// - V8: `    at func (file:line:col)` or `    at file:line:col`
/// - Gecko/JavaScriptCore: `func@file:line:col` or `@file:line:col`
fn parse_text_stack(text: &str) -> Vec<StackFrame> {
	text.lines().filter_map(parse_text_line).collect()
}

fn parse_text_line(line: &str) -> Option<StackFrame> {
	let line = line.trim();
	if line.is_empty() {
		return None;
	}

	if let Some(rest) = line.strip_prefix("at ") {
		return Some(parse_v8_frame(rest));
	}

	if let Some(at) = line.rfind('@') {
		let func = line[..at].trim();
		let (file, lineno, col) = split_position(&line[at + 1..]);
		return Some(StackFrame {
			func: (!func.is_empty()).then(|| func.to_string()),
			file,
			line: lineno,
			col,
		});
	}

	// Leading "Error: message" line and anything else unrecognized.
	None
}

fn parse_v8_frame(rest: &str) -> StackFrame {
	// "func (file:line:col)" when a function name is known, bare
	// "file:line:col" otherwise.
	if let Some(open) = rest.find('(') {
		let func = rest[..open].trim();
		let position = rest[open + 1..].trim_end_matches(')');
		let (file, line, col) = split_position(position);
		StackFrame {
			func: (!func.is_empty()).then(|| func.to_string()),
			file,
			line,
			col,
		}
	} else {
		let (file, line, col) = split_position(rest.trim());
		StackFrame {
			func: None,
			file,
			line,
			col,
		}
	}
}

/// Split `file:line:col` from the right; the file part may itself contain
/// colons (URLs with a scheme or port).
fn split_position(position: &str) -> (Option<String>, Option<u32>, Option<u32>) {
	let mut parts = position.rsplitn(3, ':');
	let col = parts.next().and_then(|p| p.parse().ok());
	let line = parts.next().and_then(|p| p.parse().ok());
	let file = parts.next().filter(|f| !f.is_empty()).map(str::to_string);

	match (file, line, col) {
		(Some(file), Some(line), Some(col)) => (Some(file), Some(line), Some(col)),
		// Not a position triple at all; keep the text as the file reference.
		_ => (
			(!position.is_empty()).then(|| position.to_string()),
			None,
			None,
		),
	}
}
