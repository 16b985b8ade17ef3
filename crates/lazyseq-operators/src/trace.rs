//! Tracing hooks for buffering operators.
//!
//! Compiled to no-ops unless the `tracing` feature is enabled. Faults are never
//! reported here; they always propagate to the caller.

#[cfg(feature = "tracing")]
pub(crate) fn buffered(op: &'static str, items: usize) {
    tracing::trace!(op, items, "buffered source");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn buffered(_op: &'static str, _items: usize) {}

#[cfg(feature = "tracing")]
pub(crate) fn grouped(op: &'static str, items: usize, groups: usize) {
    tracing::trace!(op, items, groups, "built keyed groups");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn grouped(_op: &'static str, _items: usize, _groups: usize) {}
