// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The pattern language.
//!
//! A pattern is plain text in which four unit symbols mark where hours,
//! minutes, seconds and sub-second digits go. Each symbol must form a single
//! contiguous run; the run length is the field width.
//!
//! | Symbol | Unit                                   |
//! |--------|----------------------------------------|
//! | `H`    | hours                                  |
//! | `M`    | minutes                                |
//! | `S`    | seconds                                |
//! | `L`    | tenths / hundredths / milliseconds     |
//! | `#`    | escape: `#H` is a literal `H`          |
//!
//! # Types
//!
//! - [`Symbols`] - The configurable symbol set
//! - [`TimeUnit`] - The four displayable units
//! - [`Position`] - Where a unit field sits in the template
//! - [`Semantic`] - Validated pattern metadata
//! - [`Analyzer`] - Produces a [`Semantic`] from a pattern string

mod analyzer;
mod position;
mod semantic;
mod symbols;

pub use analyzer::Analyzer;
pub use position::Position;
pub use semantic::Semantic;
pub use symbols::{Symbols, TimeUnit};
pub(crate) use symbols::SymbolsRepr;

/// Analyzes `pattern` with the default symbols.
///
/// # Errors
///
/// See [`Analyzer::analyze`].
///
/// # Examples
///
/// ```
/// let semantic = tickmark::pattern::analyze("MM:SS.LL").unwrap();
/// assert_eq!(semantic.template(), "MM:SS.LL");
/// ```
pub fn analyze(pattern: &str) -> Result<Semantic, crate::error::PatternError> {
    Analyzer::default().analyze(pattern)
}
