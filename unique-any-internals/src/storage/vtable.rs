//! Vtable for type-erased payload operations.
//!
//! This module contains the [`PayloadVtable`] which lets a [`RawUniqueAny`]
//! destroy and relocate its payload after the payload's concrete type `P` has
//! been erased. The vtable stores function pointers that dispatch to the
//! correct typed implementations.
//!
//! This module encapsulates the fields of [`PayloadVtable`] so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **every function pointer in a vtable was instantiated with the
//! same payload type `P`**.
//!
//! # Safety Invariant
//!
//! This invariant is maintained because vtables are created as `&'static`
//! references via [`PayloadVtable::new`], which pairs the function pointers
//! with a specific type `P` at compile time.
//!
//! [`RawUniqueAny`]: crate::RawUniqueAny

use core::{any::TypeId, ptr::NonNull};

use crate::util::Erased;

/// Vtable for type-erased payload operations.
///
/// # Safety Invariant
///
/// The fields `type_id`, `drop` and `relocate` are guaranteed to point to the
/// functions defined below instantiated with the payload type `P` that was used
/// to create this [`PayloadVtable`].
pub(crate) struct PayloadVtable {
    /// Gets the [`TypeId`] of the payload type that was used to create this
    /// [`PayloadVtable`].
    type_id: fn() -> TypeId,
    /// Drops the payload pointed to in place.
    drop: unsafe fn(NonNull<Erased>),
    /// Moves the payload from the first pointer into the buffer behind the
    /// second pointer.
    relocate: unsafe fn(NonNull<Erased>, NonNull<Erased>),
}

impl PayloadVtable {
    /// Creates a new [`PayloadVtable`] for the payload type `P`.
    pub(super) const fn new<P: 'static>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<P>,
                drop: drop::<P>,
                relocate: relocate::<P>,
            }
        }
    }

    /// Gets the [`TypeId`] of the payload type that was used to create this
    /// [`PayloadVtable`].
    #[inline]
    pub(super) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Drops the payload pointed to by `ptr` in place.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `ptr` points to an initialized, properly aligned payload of the type
    ///    this [`PayloadVtable`] was created for.
    /// 2. `ptr` is valid for writes.
    /// 3. The payload is not used again after this call. In particular it must
    ///    not be dropped a second time.
    #[inline]
    pub(super) unsafe fn drop(&self, ptr: NonNull<Erased>) {
        // SAFETY: We know that `self.drop` points to the function `drop::<P>` below.
        // That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe {
            (self.drop)(ptr);
        }
    }

    /// Moves the payload at `src` into the storage at `dst`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `src` points to an initialized, properly aligned payload of the type
    ///    this [`PayloadVtable`] was created for.
    /// 2. `dst` is valid for writes of that type and properly aligned for it.
    /// 3. `src` and `dst` do not overlap.
    /// 4. The payload at `src` is treated as moved-out afterwards: it must not
    ///    be read or dropped again.
    #[inline]
    pub(super) unsafe fn relocate(&self, src: NonNull<Erased>, dst: NonNull<Erased>) {
        // SAFETY: We know that `self.relocate` points to the function
        // `relocate::<P>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        // 4. Guaranteed by the caller
        unsafe {
            (self.relocate)(src, dst);
        }
    }
}

/// Drops the `P` pointed to by `ptr` in place.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `ptr` points to an initialized, properly aligned `P`.
/// 2. `ptr` is valid for writes.
/// 3. The `P` is not used again after this call.
unsafe fn drop<P: 'static>(ptr: NonNull<Erased>) {
    let ptr: NonNull<P> = ptr.cast::<P>();
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller
    // 3. Guaranteed by the caller
    unsafe {
        ptr.drop_in_place();
    }
}

/// Moves the `P` at `src` into `dst`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `src` points to an initialized, properly aligned `P`.
/// 2. `dst` is valid for writes of a `P` and properly aligned for it.
/// 3. `src` and `dst` do not overlap.
/// 4. The `P` at `src` is not read or dropped again.
unsafe fn relocate<P: 'static>(src: NonNull<Erased>, dst: NonNull<Erased>) {
    let src: NonNull<P> = src.cast::<P>();
    let dst: NonNull<P> = dst.cast::<P>();
    // SAFETY:
    // 1. Guaranteed by the caller
    // 3. Guaranteed by the caller
    // 4. Guaranteed by the caller, so this bitwise read becomes the only owner
    let payload: P = unsafe { src.read() };
    // SAFETY:
    // 2. Guaranteed by the caller
    unsafe {
        dst.write(payload);
    }
}

#[cfg(test)]
mod tests {
    use alloc::{rc::Rc, string::String};
    use core::{cell::Cell, mem::MaybeUninit};

    use super::*;

    #[test]
    fn test_payload_vtable_eq() {
        // Vtables are promoted constants, so the same payload type always
        // yields the same static instance
        let vtable1 = PayloadVtable::new::<i32>();
        let vtable2 = PayloadVtable::new::<i32>();
        assert!(core::ptr::eq(vtable1, vtable2));

        let vtable3 = PayloadVtable::new::<String>();
        assert!(!core::ptr::eq(vtable1, vtable3));
    }

    #[test]
    fn test_payload_type_id() {
        assert_eq!(PayloadVtable::new::<i32>().type_id(), TypeId::of::<i32>());
        assert_eq!(
            PayloadVtable::new::<String>().type_id(),
            TypeId::of::<String>()
        );
    }

    #[test]
    fn test_drop_runs_destructor_once() {
        struct Tracked(Rc<Cell<usize>>);
        impl Drop for Tracked {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let drops = Rc::new(Cell::new(0));
        let mut slot = MaybeUninit::new(Tracked(drops.clone()));
        let vtable = PayloadVtable::new::<Tracked>();

        // SAFETY: `slot` holds an initialized `Tracked` that is never touched again
        unsafe {
            vtable.drop(NonNull::from(&mut slot).cast::<Erased>());
        }
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_relocate_moves_without_dropping() {
        let mut src = MaybeUninit::new(String::from("payload"));
        let mut dst = MaybeUninit::<String>::uninit();
        let vtable = PayloadVtable::new::<String>();

        // SAFETY: `src` holds an initialized `String`, `dst` is a distinct slot of
        // the same type, and `src` is never read again
        unsafe {
            vtable.relocate(
                NonNull::from(&mut src).cast::<Erased>(),
                NonNull::from(&mut dst).cast::<Erased>(),
            );
        }

        // SAFETY: `relocate` initialized `dst`
        let moved = unsafe { dst.assume_init() };
        assert_eq!(moved, "payload");
    }
}
