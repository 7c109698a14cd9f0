//! Pattern matching over property graphs.
//!
//! A [`PatternGraph`] describes the shape to look for: labelled placeholder
//! nodes joined by typed placeholder relationships, optionally pinned to
//! concrete graph elements and constrained by properties. Given a root
//! pattern node bound to a starting graph node, [`PatternMatcher`] lazily
//! enumerates every embedding of the pattern reachable from there, in which
//! no graph relationship is used twice.
//!
//! Relationships flagged optional form fragments that are matched
//! separately and combined with each required match as a cross product.

mod error;
mod finder;
mod matcher;
mod optional;
mod pattern;
mod pattern_match;
mod state;

pub use crate::error::*;
pub use crate::finder::*;
pub use crate::matcher::*;
pub use crate::optional::*;
pub use crate::pattern::*;
pub use crate::pattern_match::*;
