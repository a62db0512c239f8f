//! Type-erased inline container.
//!
//! This module encapsulates the `vtable` and `buffer` fields of
//! [`RawUniqueAny`], ensuring they are only visible within this module. This
//! visibility restriction guarantees the safety invariant: **the vtable slot
//! is `Some(vtable)` exactly when the buffer holds a live payload, and
//! `vtable` was created for that payload's type**.
//!
//! # Safety Invariant
//!
//! Every method below that writes a payload into the buffer stores the
//! matching vtable in the same call, and every method that ends a payload's
//! life (drop or move-out) clears the slot *before* doing so. A panic in a
//! payload destructor therefore leaves the container empty instead of holding
//! a half-dropped value.
//!
//! # Moves
//!
//! The buffer never stores pointers into itself, so a plain Rust move of a
//! [`RawUniqueAny`] is a valid relocation of its payload. The vtable's
//! `relocate` function is used when the payload has to move between two
//! containers that both stay where they are: [`RawUniqueAny::take`] and
//! [`RawUniqueAny::move_from`].

use core::{any::TypeId, marker::PhantomData};

use crate::{
    storage::{buffer::InlineBuffer, vtable::PayloadVtable},
    util::Erased,
};

/// An inline buffer holding at most one payload of an erased type, together
/// with the vtable that knows how to drop and relocate it.
///
/// The container is neither `Send` nor `Sync`, since it cannot know whether
/// its payload is. Wrappers that restrict payloads to thread-safe types may
/// lift this.
pub struct RawUniqueAny {
    /// The vtable of the live payload, or `None` if the container is empty.
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. If this is `Some(vtable)`, then `buffer` holds an initialized payload
    ///    of the type `vtable` was created for.
    /// 2. If this is `None`, then `buffer` holds no payload that still needs
    ///    to be dropped.
    vtable: Option<&'static PayloadVtable>,
    /// Storage for the payload
    buffer: InlineBuffer,
    /// Opts out of the `Send` auto trait, which the fields above would
    /// otherwise grant regardless of the payload
    _not_send_sync: PhantomData<*mut Erased>,
}

impl RawUniqueAny {
    /// Creates a container holding no payload.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            vtable: None,
            buffer: InlineBuffer::uninit(),
            _not_send_sync: PhantomData,
        }
    }

    /// Creates a container holding `payload`.
    ///
    /// Fails to build if `P` is larger than [`CAPACITY`] or if its alignment
    /// does not divide [`ALIGNMENT`].
    ///
    /// [`CAPACITY`]: crate::CAPACITY
    /// [`ALIGNMENT`]: crate::ALIGNMENT
    #[inline]
    pub fn new<P: 'static>(payload: P) -> Self {
        let mut this = Self::empty();
        this.set(payload);
        this
    }

    /// Returns `true` if no payload is live.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vtable.is_none()
    }

    /// Drops the current payload, if any, and stores `payload` in its place.
    ///
    /// `payload` may have a different type than the one it replaces.
    #[inline]
    pub fn set<P: 'static>(&mut self, payload: P) {
        self.clear();
        self.buffer.write(payload);
        // Invariant 1 holds again: the buffer now holds a `P` and the vtable
        // is the one for `P`.
        self.vtable = Some(PayloadVtable::new::<P>());
    }

    /// Drops the current payload, if any, leaving the container empty.
    ///
    /// Calling this on an empty container does nothing.
    #[inline]
    pub fn clear(&mut self) {
        // Clearing the slot first upholds invariant 2 even if the destructor
        // below panics.
        if let Some(vtable) = self.vtable.take() {
            let ptr = self.buffer.as_mut_ptr();
            // SAFETY:
            // 1. The slot was `Some(vtable)`, so by invariant 1 the buffer holds an
            //    initialized payload of the type `vtable` was created for. The
            //    buffer is aligned to `ALIGNMENT`, which the payload's alignment
            //    divides.
            // 2. `ptr` was derived from a unique borrow of the buffer.
            // 3. The slot is now `None`, so nothing will touch this payload again.
            unsafe {
                vtable.drop(ptr);
            }
        }
    }

    /// Drops the current payload, if any, then moves the payload of `other`
    /// into this container.
    ///
    /// Afterwards `other` is empty. If `other` was empty, so is `self`.
    #[inline]
    pub fn move_from(&mut self, other: &mut Self) {
        self.clear();
        if let Some(vtable) = other.vtable.take() {
            let src = other.buffer.as_mut_ptr();
            let dst = self.buffer.as_mut_ptr();
            // SAFETY:
            // 1. `other`'s slot was `Some(vtable)`, so by invariant 1 its buffer
            //    holds an initialized payload of the type `vtable` was created for.
            // 2. `dst` is the start of an `InlineBuffer`, which is large and
            //    aligned enough for any payload that was ever written into one.
            // 3. `self` and `other` are distinct unique borrows, so their buffers
            //    do not overlap.
            // 4. `other`'s slot is now `None`, so its buffer is never read or
            //    dropped as a payload again.
            unsafe {
                vtable.relocate(src, dst);
            }
            // Invariant 1 holds for `self`: its buffer now holds the payload
            // `vtable` was created for.
            self.vtable = Some(vtable);
        }
    }

    /// Moves the payload out of this container into a new one.
    ///
    /// Afterwards `self` is empty. Taking from an empty container returns an
    /// empty container.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        let mut taken = Self::empty();
        taken.move_from(self);
        taken
    }

    /// Accesses the payload as a reference to the specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The container holds a payload.
    /// 2. The type `P` matches the actual type of the payload.
    #[inline]
    pub unsafe fn payload_unchecked<P: 'static>(&self) -> &P {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(
            self.vtable.map(|vtable| vtable.type_id()),
            Some(TypeId::of::<P>())
        );

        let ptr = self.buffer.as_ptr().cast::<P>();
        // SAFETY:
        // - The pointer is non-null and aligned for `P`, since the buffer is
        //   aligned to `ALIGNMENT` and any `P` that was written into it has an
        //   alignment dividing that
        // - The pointee is an initialized `P` (guaranteed by the caller)
        // - Shared access is allowed, since we hold `&self`
        // - The returned lifetime is tied to `&self`, which keeps the payload alive
        //   and prevents it from being replaced
        unsafe { ptr.as_ref() }
    }

    /// Accesses the payload as a mutable reference to the specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The container holds a payload.
    /// 2. The type `P` matches the actual type of the payload.
    #[inline]
    pub unsafe fn payload_unchecked_mut<P: 'static>(&mut self) -> &mut P {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(
            self.vtable.map(|vtable| vtable.type_id()),
            Some(TypeId::of::<P>())
        );

        let mut ptr = self.buffer.as_mut_ptr().cast::<P>();
        // SAFETY:
        // - The pointer is non-null and aligned for `P` (see `payload_unchecked`)
        // - The pointee is an initialized `P` (guaranteed by the caller)
        // - Unique access is guaranteed by `&mut self`
        // - The returned lifetime is tied to `&mut self`
        unsafe { ptr.as_mut() }
    }

    /// Moves the payload out of the container, leaving it empty.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The container holds a payload.
    /// 2. The type `P` matches the actual type of the payload.
    #[inline]
    pub unsafe fn take_unchecked<P: 'static>(&mut self) -> P {
        debug_assert_eq!(
            self.vtable.map(|vtable| vtable.type_id()),
            Some(TypeId::of::<P>())
        );

        // Upholds invariant 2: ownership of the payload moves to the caller.
        self.vtable = None;
        let ptr = self.buffer.as_mut_ptr().cast::<P>();
        // SAFETY:
        // - The pointer is aligned for `P` (see `payload_unchecked`)
        // - The pointee is an initialized `P` (guaranteed by the caller)
        // - The slot was cleared above, so the bytes left behind are never dropped
        unsafe { ptr.read() }
    }
}

impl Default for RawUniqueAny {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl core::ops::Drop for RawUniqueAny {
    #[inline]
    fn drop(&mut self) {
        self.clear();
    }
}

impl core::fmt::Debug for RawUniqueAny {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawUniqueAny")
            .field("occupied", &!self.is_empty())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, rc::Rc, string::String, vec::Vec};
    use core::cell::RefCell;

    use super::*;
    use crate::storage::buffer::{ALIGNMENT, CAPACITY};

    type DropLog = Rc<RefCell<Vec<String>>>;

    struct Tracked {
        name: &'static str,
        log: DropLog,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.log.borrow_mut().push(format!("Dropped: {}", self.name));
        }
    }

    #[test]
    fn test_raw_unique_any_size() {
        // The vtable slot is padded up to the buffer alignment
        assert_eq!(core::mem::size_of::<RawUniqueAny>(), CAPACITY + ALIGNMENT);
        assert_eq!(core::mem::align_of::<RawUniqueAny>(), ALIGNMENT);
    }

    #[test]
    fn test_new_and_read_back() {
        let raw = RawUniqueAny::new(42u64);
        assert!(!raw.is_empty());
        // SAFETY: the container holds a `u64`
        assert_eq!(unsafe { *raw.payload_unchecked::<u64>() }, 42);
    }

    #[test]
    fn test_mutate_in_place() {
        let mut raw = RawUniqueAny::new(String::from("left"));
        // SAFETY: the container holds a `String`
        unsafe { raw.payload_unchecked_mut::<String>() }.push_str("-right");
        // SAFETY: the container holds a `String`
        assert_eq!(unsafe { raw.payload_unchecked::<String>() }, "left-right");
    }

    #[test]
    fn test_set_drops_previous_payload_once() {
        let log = DropLog::default();
        let mut raw = RawUniqueAny::new(Tracked {
            name: "first",
            log: log.clone(),
        });

        raw.set(23.5f32);
        assert_eq!(*log.borrow(), ["Dropped: first"]);
        // SAFETY: the container holds an `f32`
        assert_eq!(unsafe { *raw.payload_unchecked::<f32>() }, 23.5);

        drop(raw);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let log = DropLog::default();
        let mut raw = RawUniqueAny::new(Tracked {
            name: "only",
            log: log.clone(),
        });

        raw.clear();
        raw.clear();
        assert!(raw.is_empty());
        drop(raw);
        assert_eq!(*log.borrow(), ["Dropped: only"]);
    }

    #[test]
    fn test_take_leaves_source_empty() {
        let log = DropLog::default();
        let mut source = RawUniqueAny::new(Tracked {
            name: "moved",
            log: log.clone(),
        });

        let taken = source.take();
        assert!(source.is_empty());
        assert!(!taken.is_empty());

        drop(source);
        assert!(log.borrow().is_empty());
        drop(taken);
        assert_eq!(*log.borrow(), ["Dropped: moved"]);
    }

    #[test]
    fn test_take_from_empty() {
        let mut source = RawUniqueAny::empty();
        let taken = source.take();
        assert!(source.is_empty());
        assert!(taken.is_empty());
    }

    #[test]
    fn test_move_from_replaces_and_empties_source() {
        let log = DropLog::default();
        let mut target = RawUniqueAny::new(Tracked {
            name: "target",
            log: log.clone(),
        });
        let mut source = RawUniqueAny::new(String::from("incoming"));

        target.move_from(&mut source);
        assert_eq!(*log.borrow(), ["Dropped: target"]);
        assert!(source.is_empty());
        // SAFETY: the target now holds the `String`
        assert_eq!(unsafe { target.payload_unchecked::<String>() }, "incoming");
    }

    #[test]
    fn test_move_from_empty_empties_target() {
        let log = DropLog::default();
        let mut target = RawUniqueAny::new(Tracked {
            name: "target",
            log: log.clone(),
        });
        let mut source = RawUniqueAny::empty();

        target.move_from(&mut source);
        assert!(target.is_empty());
        assert!(source.is_empty());
        assert_eq!(*log.borrow(), ["Dropped: target"]);
    }

    #[test]
    fn test_take_unchecked() {
        let mut raw = RawUniqueAny::new(String::from("owned"));
        // SAFETY: the container holds a `String`
        let value = unsafe { raw.take_unchecked::<String>() };
        assert_eq!(value, "owned");
        assert!(raw.is_empty());
    }

    #[test]
    fn test_debug_shows_occupancy_only() {
        let raw = RawUniqueAny::new(7u8);
        assert_eq!(format!("{raw:?}"), "RawUniqueAny { occupied: true, .. }");
        let raw = RawUniqueAny::empty();
        assert_eq!(format!("{raw:?}"), "RawUniqueAny { occupied: false, .. }");
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_not_impl_any!(RawUniqueAny: Send, Sync, Clone, Copy);
    }
}
