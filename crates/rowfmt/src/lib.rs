//! rowfmt - Reusable line-format programs for record-shaped data.
//!
//! rowfmt compiles a tiny printf-like template language into an immutable
//! [`LineFormat`] program that can be re-applied to any number of records.
//! It provides:
//!
//! - A template compiler: `%%` escapes a percent sign, `%X` derives the
//!   implicit field key `%X`, and everything else is literal text
//! - A builder for assembling programs part by part
//! - [`ValueSource`], the capability that decouples "what text do I need
//!   for key K" from "where K's value lives", with map, closure, and
//!   projection-adapter implementations
//! - [`FieldWidths`], the width oracle consulted when a padded field should
//!   be aligned to a column
//!
//! # Quick Start
//!
//! ```rust
//! use rowfmt::{LineFormat, Projection};
//!
//! struct Task {
//!     name: String,
//!     done: bool,
//! }
//!
//! let format = LineFormat::builder()
//!     .field("mark")
//!     .literal(" ")
//!     .field("name")
//!     .build();
//!
//! let mut adapter = Projection::builder()
//!     .field("mark", |t: &Task| String::from(if t.done { "x" } else { "-" }))?
//!     .field("name", |t: &Task| t.name.clone())?
//!     .build();
//!
//! adapter.set_current(Task { name: "write docs".into(), done: true });
//! assert_eq!(format.render(&adapter)?, "x write docs");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Rendering Semantics
//!
//! Rendering walks segments in order: literals append verbatim, fields
//! resolve through the value source. A single missing key fails the whole
//! line with a [`FormatError`] carrying the resolution error as its cause.
//! There is no partial-output contract, and the appending render variants
//! roll the buffer back on failure.
//!
//! Padding applies only when three things line up: the field's policy is
//! [`Padding::Left`] or [`Padding::Right`], a width oracle was supplied,
//! and the oracle knows the key. Values are padded with spaces to the
//! target display width and never truncated.
//!
//! Batch-wide alignment, where each column's width is computed over a window
//! of records before any line is emitted, lives in the `rowfmt-buffered`
//! crate.

mod compile;
mod error;
mod format;
mod segment;
mod value;
mod width;

pub use compile::PaddingSpec;
pub use error::{CompileError, FormatError, ProjectionError, ResolveError};
pub use format::{LineFormat, LineFormatBuilder};
pub use segment::{Padding, Segment};
pub use value::{MapSource, Projection, ProjectionBuilder, ValueSource};
pub use width::{display_width, FieldWidths, MaxWidths};
