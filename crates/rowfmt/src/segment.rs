//! Format segments and the padding policy.

use serde::{Deserialize, Serialize};

/// Which side of a field value receives pad spaces.
///
/// Padding only ever widens a value up to the target width; a value at or
/// over the target is emitted whole.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Padding {
    /// Never pad, regardless of any width supplied.
    #[default]
    None,
    /// Insert spaces before the value, right-aligning it.
    Left,
    /// Insert spaces after the value, left-aligning it.
    Right,
}

/// One part of a compiled [`LineFormat`](crate::LineFormat).
///
/// The set is closed: rendering matches exhaustively, so a new segment kind
/// is a compile-time change, not a run-time type check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Text emitted verbatim, never resolved.
    Literal(String),
    /// A field resolved at render time against a value source by key.
    Field {
        /// The key handed to the value source.
        key: String,
        /// How the resolved value is padded when a width is known.
        padding: Padding,
    },
}

impl Segment {
    /// The field key, or `None` for literals.
    pub fn key(&self) -> Option<&str> {
        match self {
            Segment::Literal(_) => None,
            Segment::Field { key, .. } => Some(key),
        }
    }
}
