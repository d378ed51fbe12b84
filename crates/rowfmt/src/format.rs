//! The compiled format program and its builder.

use crate::error::FormatError;
use crate::segment::{Padding, Segment};
use crate::value::ValueSource;
use crate::width::{display_width, FieldWidths};

/// A compiled, immutable formatting program.
///
/// A `LineFormat` owns an ordered sequence of [`Segment`]s plus the derived
/// list of field keys in program order (duplicates kept). It carries no
/// mutable state, so one program can be shared across threads and reused for
/// any number of renders.
///
/// Build one with [`compile`](LineFormat::compile) from a printf-style
/// template, or programmatically via [`builder`](LineFormat::builder).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineFormat {
    segments: Vec<Segment>,
    keys: Vec<String>,
}

impl LineFormat {
    /// Starts building a program from parts.
    pub fn builder() -> LineFormatBuilder {
        LineFormatBuilder::new()
    }

    /// The program's segments, in render order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Every field key, first-to-last. Repeats are kept and nothing is
    /// deduplicated, so the slice mirrors the fields a render will resolve.
    pub fn field_keys(&self) -> &[String] {
        &self.keys
    }

    /// Renders one line against a value source.
    pub fn render<S>(&self, values: &S) -> Result<String, FormatError>
    where
        S: ValueSource + ?Sized,
    {
        let mut out = String::new();
        self.render_into(values, &mut out)?;
        Ok(out)
    }

    /// Renders one line, padding fields to the widths the oracle reports.
    pub fn render_aligned<S, W>(&self, values: &S, widths: &W) -> Result<String, FormatError>
    where
        S: ValueSource + ?Sized,
        W: FieldWidths,
    {
        let mut out = String::new();
        self.render_aligned_into(values, widths, &mut out)?;
        Ok(out)
    }

    /// Appends one rendered line to `out`.
    ///
    /// On failure `out` is truncated back to its pre-call length; a failed
    /// render never leaves partial output behind.
    pub fn render_into<S>(&self, values: &S, out: &mut String) -> Result<(), FormatError>
    where
        S: ValueSource + ?Sized,
    {
        self.render_segments(values, None, out)
    }

    /// Appends one rendered, width-aligned line to `out`.
    ///
    /// Padding applies only to fields whose policy is not [`Padding::None`]
    /// and whose key the oracle knows; everything else renders as
    /// [`render_into`](LineFormat::render_into) would. The same truncate-on-
    /// failure guarantee holds.
    pub fn render_aligned_into<S, W>(
        &self,
        values: &S,
        widths: &W,
        out: &mut String,
    ) -> Result<(), FormatError>
    where
        S: ValueSource + ?Sized,
        W: FieldWidths,
    {
        self.render_segments(values, Some(widths as &dyn FieldWidths), out)
    }

    fn render_segments<S>(
        &self,
        values: &S,
        widths: Option<&dyn FieldWidths>,
        out: &mut String,
    ) -> Result<(), FormatError>
    where
        S: ValueSource + ?Sized,
    {
        let checkpoint = out.len();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { key, padding } => {
                    let value = match values.get(key) {
                        Ok(value) => value,
                        Err(cause) => {
                            out.truncate(checkpoint);
                            return Err(FormatError::from(cause));
                        }
                    };
                    let fill = match padding {
                        Padding::None => 0,
                        Padding::Left | Padding::Right => widths
                            .and_then(|w| w.width(key))
                            .map_or(0, |target| target.saturating_sub(display_width(&value))),
                    };
                    match padding {
                        Padding::Left => {
                            out.extend(std::iter::repeat(' ').take(fill));
                            out.push_str(&value);
                        }
                        Padding::None | Padding::Right => {
                            out.push_str(&value);
                            out.extend(std::iter::repeat(' ').take(fill));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Assembles a [`LineFormat`] part by part.
///
/// `build()` merges adjacent literals and drops empty ones, so two builders
/// that describe the same text produce structurally equal programs.
#[derive(Debug, Default)]
pub struct LineFormatBuilder {
    segments: Vec<Segment>,
}

impl LineFormatBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends literal text.
    pub fn literal(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment::Literal(text.into()));
        self
    }

    /// Appends an unpadded field.
    pub fn field(self, key: impl Into<String>) -> Self {
        self.field_padded(key, Padding::None)
    }

    /// Appends a field with an explicit padding policy.
    pub fn field_padded(mut self, key: impl Into<String>, padding: Padding) -> Self {
        self.segments.push(Segment::Field {
            key: key.into(),
            padding,
        });
        self
    }

    /// Seals the parts into an immutable program.
    pub fn build(self) -> LineFormat {
        let mut segments: Vec<Segment> = Vec::with_capacity(self.segments.len());
        for segment in self.segments {
            match segment {
                Segment::Literal(text) if text.is_empty() => {}
                Segment::Literal(text) => {
                    if let Some(Segment::Literal(tail)) = segments.last_mut() {
                        tail.push_str(&text);
                    } else {
                        segments.push(Segment::Literal(text));
                    }
                }
                field => segments.push(field),
            }
        }
        let keys = segments
            .iter()
            .filter_map(|segment| segment.key().map(String::from))
            .collect();
        LineFormat { segments, keys }
    }
}
