//! Batch hooks: editors and observers.
//!
//! Hooks run once per loaded batch, in registration order, editors before
//! observers. Editors get the batch mutably and may reorder, insert, or
//! remove records; observers see the post-edit batch read-only and are
//! meant for side effects such as collecting derived data. Both receive the
//! projection adapter so they can resolve record values while they run;
//! the formatter already holds the adapter lock for the whole hook run.

use std::collections::VecDeque;

use rowfmt::Projection;

/// Batch-mutation hook.
pub type Editor<T> = Box<dyn FnMut(&mut VecDeque<T>, &mut Projection<T>)>;

/// Read-only batch hook, run after every editor.
pub type Observer<T> = Box<dyn FnMut(&VecDeque<T>, &mut Projection<T>)>;

/// One entry in the observer pipeline.
///
/// The built-in width refresh occupies a slot like any user observer, so
/// its position in the run order is exactly its registration position.
pub(crate) enum ObserverSlot<T> {
    /// Recompute the batch width oracle from scratch over the post-edit
    /// batch.
    RefreshWidths,
    /// A user-registered observer.
    User(Observer<T>),
}
