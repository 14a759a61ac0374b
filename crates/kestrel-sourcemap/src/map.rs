// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source map parsing and original-position lookup.

use serde::Deserialize;

use crate::error::{Result, SourceMapError};
use crate::vlq::decode_segment;

/// Raw source map JSON structure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSourceMap {
	version: u32,
	#[serde(default)]
	file: Option<String>,
	#[serde(default)]
	source_root: Option<String>,
	sources: Vec<String>,
	names: Vec<String>,
	mappings: String,
}

/// One decoded mapping segment: a generated column and the original
/// position it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
	generated_column: u32,
	source_index: u32,
	/// 0-indexed original line.
	original_line: u32,
	/// 0-indexed original column.
	original_column: u32,
	name_index: Option<u32>,
}

/// Original position information for a minified coordinate.
///
/// Every field is optional: a map may cover the position only partially, or
/// not at all. Callers merge present fields over their raw values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedLocation {
	/// Original source file path.
	pub file: Option<String>,
	/// Line in the original source, 1-indexed.
	pub line: Option<u32>,
	/// Column in the original source, 0-indexed.
	pub column: Option<u32>,
	/// Original identifier name at the position.
	pub symbol: Option<String>,
}

impl ResolvedLocation {
	/// A lookup miss: nothing resolved.
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.file.is_none() && self.line.is_none() && self.column.is_none() && self.symbol.is_none()
	}
}

/// Parsed source map ready for lookups.
#[derive(Debug, Clone)]
pub struct SourceMap {
	file: Option<String>,
	source_root: Option<String>,
	sources: Vec<String>,
	names: Vec<String>,
	/// Segments grouped by generated line, sorted by generated column.
	lines: Vec<Vec<Segment>>,
}

impl SourceMap {
	/// Parse a source map from its JSON body.
	pub fn parse(body: &str) -> Result<Self> {
		let raw: RawSourceMap = serde_json::from_str(body)?;

		if raw.version != 3 {
			return Err(SourceMapError::UnsupportedVersion(raw.version));
		}

		let lines = decode_mapping_lines(&raw.mappings)?;

		Ok(Self {
			file: raw.file,
			source_root: raw.source_root,
			sources: raw.sources,
			names: raw.names,
			lines,
		})
	}

	/// The generated file this map describes, when recorded.
	pub fn generated_file(&self) -> Option<&str> {
		self.file.as_deref()
	}

	/// Number of decoded mapping segments.
	pub fn segment_count(&self) -> usize {
		self.lines.iter().map(Vec::len).sum()
	}

	/// Look up the original position for a generated coordinate.
	///
	/// `line` is 1-indexed as stack traces display it, `column` is
	/// 0-indexed. A position the map does not cover yields an empty
	/// location rather than an error.
	pub fn original_position_for(&self, line: u32, column: u32) -> ResolvedLocation {
		let Some(segment) = self.find_segment(line.saturating_sub(1), column) else {
			return ResolvedLocation::empty();
		};

		let file = self
			.sources
			.get(segment.source_index as usize)
			.map(|source| self.join_source_root(source));
		let symbol = segment
			.name_index
			.and_then(|idx| self.names.get(idx as usize).cloned());

		ResolvedLocation {
			file,
			// 1-indexed for display.
			line: Some(segment.original_line + 1),
			column: Some(segment.original_column),
			symbol,
		}
	}

	/// Closest segment at or before `column` on the 0-indexed generated line.
	fn find_segment(&self, line: u32, column: u32) -> Option<&Segment> {
		let segments = self.lines.get(line as usize)?;
		let idx = segments.partition_point(|s| s.generated_column <= column);
		if idx == 0 {
			// Column precedes every mapping on this line.
			None
		} else {
			Some(&segments[idx - 1])
		}
	}

	fn join_source_root(&self, source: &str) -> String {
		match self.source_root.as_deref() {
			Some(root) if !root.is_empty() => {
				format!("{}/{}", root.trim_end_matches('/'), source)
			}
			_ => source.to_string(),
		}
	}
}

/// Decode the `mappings` string into per-generated-line segment lists.
///
/// Lines are separated by `;`, segments within a line by `,`. All segment
/// fields except the generated column are deltas against the previous
/// occurrence anywhere in the map; the generated column resets per line.
fn decode_mapping_lines(mappings: &str) -> Result<Vec<Vec<Segment>>> {
	let mut lines = Vec::new();

	let mut source_index = 0i32;
	let mut original_line = 0i32;
	let mut original_column = 0i32;
	let mut name_index = 0i32;

	for encoded_line in mappings.split(';') {
		let mut segments = Vec::new();
		let mut generated_column = 0i32;

		for encoded_segment in encoded_line.split(',') {
			if encoded_segment.is_empty() {
				continue;
			}

			let fields = decode_segment(encoded_segment)?;
			match fields.len() {
				1 => {
					// Generated-column-only segment, maps to nothing.
					generated_column += fields[0];
				}
				4 | 5 => {
					generated_column += fields[0];
					source_index += fields[1];
					original_line += fields[2];
					original_column += fields[3];

					let name = if fields.len() == 5 {
						name_index += fields[4];
						Some(name_index as u32)
					} else {
						None
					};

					segments.push(Segment {
						generated_column: generated_column as u32,
						source_index: source_index as u32,
						original_line: original_line as u32,
						original_column: original_column as u32,
						name_index: name,
					});
				}
				n => return Err(SourceMapError::MalformedSegment(n)),
			}
		}

		lines.push(segments);
	}

	Ok(lines)
}
