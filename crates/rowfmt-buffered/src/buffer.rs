//! The buffered table formatter.

use std::collections::VecDeque;
use std::iter::Peekable;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rowfmt::{display_width, FormatError, LineFormat, MaxWidths, Projection};

use crate::error::StreamError;
use crate::hooks::{Editor, ObserverSlot};

/// A pull-based iterator of formatted lines over a sequence of records.
///
/// Records are buffered into batches so that features requiring the whole
/// window at once, column alignment above all, can run before the first
/// line of the batch is emitted. Each demand for a line drains the head of
/// the current batch; when the batch empties, the next demand loads a new
/// one.
///
/// # Batch lifecycle
///
/// 1. Pull records from the input until the block size is reached or the
///    input is exhausted. With [`track_widths`](BufferedLines::track_widths)
///    enabled, every pulled record is measured for every field key and the
///    per-key maxima are folded into the batch width oracle, which is
///    cleared at the start of each load.
/// 2. Every editor runs once, in registration order, against the mutable
///    batch.
/// 3. Every observer runs once, in registration order, against the
///    post-edit batch.
/// 4. If the batch is still empty, the demand fails with
///    [`StreamError::Exhausted`].
/// 5. Otherwise the head record is removed, set as the adapter's current
///    record, and rendered.
///
/// # Width timing
///
/// Width discovery is two-phase and deliberately explicit: the load-time
/// pass in step 1 sees the batch as pulled, so an editor that inserts or
/// removes records does not retroactively change the widths already folded
/// in. Call [`refresh_widths`](BufferedLines::refresh_widths) to register
/// the built-in observer that recomputes the oracle from scratch over the
/// post-edit batch; reordering-only editors then still see correct final
/// alignment.
pub struct BufferedLines<I: Iterator> {
    format: LineFormat,
    records: Peekable<I>,
    adapter: Arc<Mutex<Projection<I::Item>>>,
    batch: VecDeque<I::Item>,
    widths: MaxWidths,
    block_size: usize,
    track_widths: bool,
    editors: Vec<Editor<I::Item>>,
    observers: Vec<ObserverSlot<I::Item>>,
}

impl<I: Iterator> BufferedLines<I> {
    /// Creates a formatter that owns its projection adapter.
    pub fn new(format: LineFormat, records: I, adapter: Projection<I::Item>) -> Self {
        Self::with_shared_adapter(format, records, Arc::new(Mutex::new(adapter)))
    }

    /// Creates a formatter over an adapter shared with other callers.
    ///
    /// The lock is held for one logical step at a time: measuring one
    /// record, running the batch hooks, or (set current + render) for one
    /// record. Another thread locking the same adapter always observes it
    /// between steps, never inside one.
    pub fn with_shared_adapter(
        format: LineFormat,
        records: I,
        adapter: Arc<Mutex<Projection<I::Item>>>,
    ) -> Self {
        BufferedLines {
            format,
            records: records.peekable(),
            adapter,
            batch: VecDeque::new(),
            widths: MaxWidths::new(),
            block_size: usize::MAX,
            track_widths: false,
            editors: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// Bounds how many records one batch may hold.
    ///
    /// The default consumes the whole remaining input into a single batch.
    /// A block size of zero is rejected here, before any record is pulled.
    pub fn with_block_size(mut self, block_size: usize) -> Result<Self, StreamError> {
        if block_size == 0 {
            return Err(StreamError::InvalidBlockSize(block_size));
        }
        self.block_size = block_size;
        Ok(self)
    }

    /// The configured batch bound.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Registers a batch editor. Editors run once per batch, in
    /// registration order, and may reorder, insert, or remove records.
    ///
    /// Editing happens after load-time width discovery; see the type-level
    /// notes on width timing.
    pub fn edit<F>(mut self, editor: F) -> Self
    where
        F: FnMut(&mut VecDeque<I::Item>, &mut Projection<I::Item>) + 'static,
    {
        self.editors.push(Box::new(editor));
        self
    }

    /// Registers a read-only batch observer. Observers run once per batch,
    /// after every editor, in registration order.
    pub fn observe<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&VecDeque<I::Item>, &mut Projection<I::Item>) + 'static,
    {
        self.observers.push(ObserverSlot::User(Box::new(observer)));
        self
    }

    /// Opts into width tracking: each batch's per-key maximum display
    /// widths are discovered while the batch loads, and padded fields are
    /// aligned to them at render time.
    ///
    /// Without this call no padding is ever applied, whatever the format's
    /// padding policies say.
    pub fn track_widths(mut self) -> Self {
        self.track_widths = true;
        self
    }

    /// Opts into width tracking and registers the built-in observer that
    /// recomputes the width oracle over the post-edit batch, at this
    /// position in the observer order.
    ///
    /// Use this whenever an editor changes batch membership; load-time
    /// discovery alone would keep serving the pre-edit widths.
    pub fn refresh_widths(mut self) -> Self {
        self.track_widths = true;
        self.observers.push(ObserverSlot::RefreshWidths);
        self
    }

    /// True while a line can still be produced from the batch or the input.
    pub fn has_next(&mut self) -> bool {
        !self.batch.is_empty() || self.records.peek().is_some()
    }

    /// Produces the next formatted line.
    pub fn next_line(&mut self) -> Result<String, StreamError> {
        let mut line = String::new();
        self.next_line_into(&mut line)?;
        Ok(line)
    }

    /// Appends the next formatted line to `out`.
    ///
    /// Fails with [`StreamError::Exhausted`] when no line can be produced;
    /// `out` is left untouched on any failure.
    pub fn next_line_into(&mut self, out: &mut String) -> Result<(), StreamError> {
        if self.batch.is_empty() {
            self.load_batch()?;
        }
        let Some(record) = self.batch.pop_front() else {
            return Err(StreamError::Exhausted);
        };

        let mut adapter = lock(&self.adapter);
        adapter.set_current(record);
        if self.track_widths {
            self.format
                .render_aligned_into(&*adapter, &self.widths, out)?;
        } else {
            self.format.render_into(&*adapter, out)?;
        }
        Ok(())
    }

    fn load_batch(&mut self) -> Result<(), StreamError> {
        self.widths.clear();
        while self.batch.len() < self.block_size {
            let Some(record) = self.records.next() else { break };
            if self.track_widths {
                let adapter = lock(&self.adapter);
                measure(&self.format, &adapter, &record, &mut self.widths)?;
            }
            self.batch.push_back(record);
        }

        let mut adapter = lock(&self.adapter);
        for editor in &mut self.editors {
            editor(&mut self.batch, &mut adapter);
        }
        for slot in &mut self.observers {
            match slot {
                ObserverSlot::RefreshWidths => {
                    self.widths.clear();
                    for record in &self.batch {
                        measure(&self.format, &adapter, record, &mut self.widths)?;
                    }
                }
                ObserverSlot::User(observer) => observer(&self.batch, &mut adapter),
            }
        }
        Ok(())
    }
}

impl<I: Iterator> Iterator for BufferedLines<I> {
    type Item = Result<String, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        match self.next_line() {
            Err(StreamError::Exhausted) => None,
            line => Some(line),
        }
    }
}

/// Folds one record's rendered display widths into the batch oracle.
fn measure<T>(
    format: &LineFormat,
    adapter: &Projection<T>,
    record: &T,
    widths: &mut MaxWidths,
) -> Result<(), FormatError> {
    for key in format.field_keys() {
        let value = adapter.resolve(record, key)?;
        widths.record(key, display_width(&value));
    }
    Ok(())
}

fn lock<T>(adapter: &Arc<Mutex<Projection<T>>>) -> MutexGuard<'_, Projection<T>> {
    // A poisoned adapter is still structurally intact: the extractor table
    // is immutable and the slot is overwritten before every use.
    adapter.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_format() -> LineFormat {
        LineFormat::builder().build()
    }

    fn no_fields() -> Projection<i64> {
        Projection::builder().build()
    }

    #[test]
    fn test_block_size_roundtrip() {
        let lines = BufferedLines::new(empty_format(), std::iter::empty::<i64>(), no_fields())
            .with_block_size(100)
            .unwrap()
            .with_block_size(50)
            .unwrap();
        assert_eq!(lines.block_size(), 50);
    }

    #[test]
    fn test_block_size_zero_rejected() {
        let mut pulled = 0usize;
        let records = std::iter::from_fn(move || {
            pulled += 1;
            Some(pulled as i64)
        });

        let result =
            BufferedLines::new(empty_format(), records, no_fields()).with_block_size(0);
        assert!(matches!(result, Err(StreamError::InvalidBlockSize(0))));
    }

    #[test]
    fn test_default_block_size_is_unbounded() {
        let lines = BufferedLines::new(empty_format(), std::iter::empty::<i64>(), no_fields());
        assert_eq!(lines.block_size(), usize::MAX);
    }

    #[test]
    fn test_empty_input_is_exhausted() {
        let mut lines =
            BufferedLines::new(empty_format(), std::iter::empty::<i64>(), no_fields());
        assert!(!lines.has_next());
        assert!(matches!(lines.next_line(), Err(StreamError::Exhausted)));
    }

    #[test]
    fn test_next_line_into_preserves_prefix() {
        let format = LineFormat::builder().literal("line").build();
        let mut lines = BufferedLines::new(format, std::iter::once(1i64), no_fields());

        let mut out = String::from(">> ");
        lines.next_line_into(&mut out).unwrap();
        assert_eq!(out, ">> line");
    }
}
