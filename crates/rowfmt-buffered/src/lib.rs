//! rowfmt-buffered - Batch-aligned streaming of line formats.
//!
//! This crate streams a compiled [`rowfmt::LineFormat`] over a sequence of
//! records. Column alignment needs the maximum value width across a whole
//! window of records before the first line of that window can be emitted,
//! so [`BufferedLines`] buffers records into bounded batches, measures
//! them, runs batch hooks, and only then serves lines one at a time.
//!
//! # Quick Start
//!
//! ```rust
//! use rowfmt::{LineFormat, Padding, Projection};
//! use rowfmt_buffered::BufferedLines;
//!
//! let format = LineFormat::builder()
//!     .field_padded("name", Padding::Right)
//!     .literal("  ")
//!     .field("age")
//!     .build();
//!
//! let people = vec![("ada", 36), ("grace", 85)];
//!
//! let adapter = Projection::builder()
//!     .field("name", |p: &(&str, i32)| p.0.to_string())?
//!     .field("age", |p: &(&str, i32)| p.1.to_string())?
//!     .build();
//!
//! let mut lines = BufferedLines::new(format, people.into_iter(), adapter)
//!     .track_widths();
//!
//! assert_eq!(lines.next_line()?, "ada    36");
//! assert_eq!(lines.next_line()?, "grace  85");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Hooks
//!
//! Each loaded batch passes through two ordered hook pipelines before any
//! of its lines are served: editors (mutable, may reorder or change batch
//! membership) and then observers (read-only). Both run in registration
//! order; there is no priority scheme. The built-in width-refreshing
//! observer registered by [`BufferedLines::refresh_widths`] takes part in
//! that same ordering.
//!
//! # Concurrency
//!
//! The formatter itself is a single-consumer, synchronous pull iterator.
//! The one shared mutable resource is the projection adapter: construct
//! with [`BufferedLines::with_shared_adapter`] to keep a handle to it, and
//! hold its lock for any access of your own. The formatter acquires it
//! once per logical step, never across steps.

mod buffer;
mod error;
mod hooks;

pub use buffer::BufferedLines;
pub use error::StreamError;
pub use hooks::{Editor, Observer};
