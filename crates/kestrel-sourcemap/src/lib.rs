// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source Map v3 parsing and position lookup for the Kestrel error catcher.
//!
//! This crate turns a downloaded source-map body into a queryable index and
//! answers the one question the enrichment pipeline asks: "which original
//! (file, line, column, symbol) does this minified (line, column) come
//! from?". Lookups never fail — a position the map does not cover resolves
//! to an empty [`ResolvedLocation`], and callers keep their raw coordinates.
//!
//! # Example
//!
//! ```
//! use kestrel_sourcemap::SourceMap;
//!
//! let map = SourceMap::parse(r#"{
//!     "version": 3,
//!     "sources": ["src/index.js"],
//!     "names": ["hello"],
//!     "mappings": "AAAAA"
//! }"#).unwrap();
//!
//! let resolved = map.original_position_for(1, 0);
//! assert_eq!(resolved.file.as_deref(), Some("src/index.js"));
//! assert_eq!(resolved.line, Some(1));
//! assert_eq!(resolved.symbol.as_deref(), Some("hello"));
//! ```

pub mod error;
pub mod map;
pub mod vlq;

pub use error::{Result, SourceMapError};
pub use map::{ResolvedLocation, SourceMap};
pub use vlq::decode_segment;
