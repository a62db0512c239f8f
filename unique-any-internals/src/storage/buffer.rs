//! The aligned inline byte region payloads live in.
//!
//! This module is the only place a payload is written into raw storage, so it
//! is also the only place the size and alignment limits need to be checked.
//! The check is an inline `const` block: a payload type that does not fit
//! fails to build as soon as [`InlineBuffer::write`] is instantiated with it.

use core::{
    cell::UnsafeCell,
    mem::{MaybeUninit, align_of, size_of},
    ptr::NonNull,
};

use crate::util::Erased;

/// Number of bytes available to a payload.
pub const CAPACITY: usize = 256;

/// Alignment of the inline buffer. The alignment of every payload type must
/// divide it.
pub const ALIGNMENT: usize = 32;

/// Fixed-size, maximally-aligned storage that may or may not hold a payload.
///
/// The buffer itself never tracks whether it is initialized. That is the job
/// of the vtable slot in [`RawUniqueAny`].
///
/// The bytes sit inside an [`UnsafeCell`] so that payloads with interior
/// mutability can be mutated through a shared reference obtained from
/// [`InlineBuffer::as_ptr`].
///
/// [`RawUniqueAny`]: crate::RawUniqueAny
#[repr(C, align(32))]
pub(super) struct InlineBuffer {
    /// The raw payload bytes
    bytes: UnsafeCell<[MaybeUninit<u8>; CAPACITY]>,
}

static_assertions::const_assert_eq!(align_of::<InlineBuffer>(), ALIGNMENT);
static_assertions::const_assert_eq!(size_of::<InlineBuffer>(), CAPACITY);

impl InlineBuffer {
    /// Creates a buffer without a payload.
    #[inline]
    pub(super) const fn uninit() -> Self {
        Self {
            bytes: UnsafeCell::new([MaybeUninit::uninit(); CAPACITY]),
        }
    }

    /// Returns a pointer to the start of the buffer.
    ///
    /// The pointer may be used for writes as well as reads for as long as no
    /// conflicting reference to the buffer is alive.
    #[inline]
    pub(super) fn as_ptr(&self) -> NonNull<Erased> {
        let ptr: *mut [MaybeUninit<u8>; CAPACITY] = self.bytes.get();
        // SAFETY: `UnsafeCell::get` on a reference never returns null.
        let ptr = unsafe { NonNull::new_unchecked(ptr) };
        ptr.cast::<Erased>()
    }

    /// Returns a pointer to the start of the buffer, derived from a unique
    /// borrow.
    #[inline]
    pub(super) fn as_mut_ptr(&mut self) -> NonNull<Erased> {
        NonNull::from(self.bytes.get_mut()).cast::<Erased>()
    }

    /// Moves `payload` into the buffer.
    ///
    /// Whatever the buffer held before is overwritten without being dropped.
    /// Callers that care about the old payload must drop it first.
    ///
    /// Instantiating this method with a `P` that is larger than [`CAPACITY`]
    /// or whose alignment does not divide [`ALIGNMENT`] is a compile-time
    /// error.
    #[inline]
    pub(super) fn write<P>(&mut self, payload: P) {
        const {
            assert!(
                size_of::<P>() <= CAPACITY,
                "payload type is larger than the inline buffer"
            );
            assert!(
                ALIGNMENT % align_of::<P>() == 0,
                "payload alignment does not divide the inline buffer alignment"
            );
        }

        let ptr = self.as_mut_ptr().cast::<P>();
        // SAFETY:
        // - `ptr` is valid for writes of `size_of::<P>()` bytes, which the const
        //   block above bounds by `CAPACITY`
        // - `ptr` is aligned for `P`, as the buffer is aligned to `ALIGNMENT` and
        //   `align_of::<P>()` divides it
        unsafe {
            ptr.write(payload);
        }
    }
}
