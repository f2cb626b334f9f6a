//! Growable scratch storage.
//!
//! Engines keep their buffers between decodes; [`request_storage`] makes sure
//! a buffer can hold at least `needed` elements without reallocating again
//! mid-step. Capacity only ever grows.

use crate::error::fatal;

/// What to do with the current contents when the buffer has to grow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Growth {
    /// Keep existing elements (the trellis arena: live paths point into it).
    Preserve,
    /// Contents are about to be rewritten; drop them before growing so the
    /// reallocation does not copy them.
    Discard,
}

/// Ensure `buf` has capacity for at least `needed` elements.
///
/// Returns `true` if the buffer had to grow. When the capacity already
/// suffices this is a no-op and the contents are untouched regardless of
/// `growth`.
///
/// Allocation failure is fatal: it is reported under `label` and the process
/// exits.
pub fn request_storage<T>(buf: &mut Vec<T>, needed: usize, growth: Growth, label: &str) -> bool {
    if needed <= buf.capacity() {
        return false;
    }
    if growth == Growth::Discard {
        buf.clear();
    }
    #[cfg(feature = "tracing")]
    let old_capacity = buf.capacity();
    if let Err(err) = buf.try_reserve(needed - buf.len()) {
        fatal(label, &err);
    }
    #[cfg(feature = "tracing")]
    tracing::debug!(
        label,
        old_capacity,
        new_capacity = buf.capacity(),
        needed,
        "scratch storage grew"
    );
    true
}
