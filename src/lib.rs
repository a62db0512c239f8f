#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Extra checks on nightly
#![cfg_attr(nightly_extra_checks, feature(rustdoc_missing_doc_code_examples))]
#![cfg_attr(nightly_extra_checks, forbid(rustdoc::missing_doc_code_examples))]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A move-only container that holds one value of any type inline, without
//! allocating.
//!
//! ## Overview
//!
//! [`UniqueAny`] is what you get when you cross a tagged union with
//! `Box<dyn Any>`: it can hold a value of any type, like a `Box<dyn Any>`, but
//! stores it in a fixed-size inline buffer, like an enum. Instead of a closed
//! set of variants, the limit is a maximum payload size of [`CAPACITY`] bytes
//! and a maximum payload alignment of [`ALIGNMENT`] bytes.
//!
//! The container is move-only. It never clones or copies its payload, so
//! payload types do not need to implement [`Clone`].
//!
//! ## Quick Example
//!
//! ```
//! use unique_any::UniqueAny;
//!
//! struct NonCopyable {
//!     value: i32,
//! }
//!
//! let mut any: UniqueAny = UniqueAny::new(NonCopyable { value: 5 });
//! // SAFETY: the container holds a `NonCopyable`
//! assert_eq!(unsafe { any.get_unchecked::<NonCopyable>() }.value, 5);
//!
//! // Reassigning with a different type drops the old payload first
//! any.set(23.5f32);
//! // SAFETY: the container now holds an `f32`
//! assert_eq!(unsafe { *any.get_unchecked::<f32>() }, 23.5);
//! ```
//!
//! ## How it works
//!
//! When a payload of type `P` is stored, the container also stores a
//! `&'static` vtable of two functions instantiated for `P`: one that drops a
//! `P` in place and one that moves a `P` from one buffer into another. Every
//! later operation goes through that vtable, so the container can destroy and
//! relocate its payload after `P` itself has been forgotten.
//!
//! | Operation | Effect |
//! |---|---|
//! | [`UniqueAny::new`] | writes the payload into the buffer and binds its vtable |
//! | [`UniqueAny::take`] | moves the payload into a new container and leaves the source empty |
//! | [`UniqueAny::move_from`] | drops the current payload, then moves another container's payload in |
//! | [`UniqueAny::set`] | drops the current payload, then writes a new one of any type |
//! | [`UniqueAny::clear`] / [`Drop`] | drops the payload, if any |
//! | [`UniqueAny::get_unchecked`] | reinterprets the buffer as a payload type named by the caller |
//!
//! A moved-from container is always empty, so a payload is dropped exactly
//! once no matter how often it changes hands.
//!
//! ## Unchecked access
//!
//! The container deliberately does not offer a way to ask which type it
//! holds. Reading the payload back requires naming its type, and naming the
//! wrong type is undefined behavior. That is why [`UniqueAny::get_unchecked`]
//! and its siblings are `unsafe`. Debug builds assert that the named type is
//! correct to help catch mistakes early, but release builds do no checking at
//! all.
//!
//! ## Compile-time limits
//!
//! Payloads that are too large, too strictly aligned, or unsized are rejected
//! when the program is built, never at runtime:
//!
//! ```compile_fail
//! use unique_any::{CAPACITY, UniqueAny};
//!
//! // One byte too large
//! let any: UniqueAny = UniqueAny::new([0u8; CAPACITY + 1]);
//! ```
//!
//! ```compile_fail
//! use unique_any::UniqueAny;
//!
//! #[repr(align(64))]
//! struct OverAligned(u8);
//!
//! // Alignment 64 does not divide ALIGNMENT (32)
//! let any: UniqueAny = UniqueAny::new(OverAligned(0));
//! ```
//!
//! ```compile_fail
//! use unique_any::UniqueAny;
//!
//! // Unsized payloads cannot be moved by value
//! let text: &str = "unsized";
//! let any: UniqueAny = UniqueAny::new(*text);
//! ```
//!
//! Payloads right at the limits are fine:
//!
//! ```
//! use unique_any::{ALIGNMENT, CAPACITY, UniqueAny};
//!
//! #[repr(align(32))]
//! struct MaxAligned(u8);
//! assert_eq!(core::mem::align_of::<MaxAligned>(), ALIGNMENT);
//!
//! let full: UniqueAny = UniqueAny::new([0u8; CAPACITY]);
//! let aligned: UniqueAny = UniqueAny::new(MaxAligned(1));
//! # drop((full, aligned));
//! ```
//!
//! The container cannot be copied or cloned either:
//!
//! ```compile_fail
//! use unique_any::UniqueAny;
//!
//! let any: UniqueAny = UniqueAny::new(5u32);
//! let copy = any.clone();
//! ```
//!
//! ## Thread safety
//!
//! A [`UniqueAny`] defaults to the [`Local`](markers::Local) marker, which
//! accepts any payload and keeps the container on one thread. Use
//! [`UniqueAny<SendSync>`](markers::SendSync) to accept only `Send + Sync`
//! payloads and get a container that can cross threads. See [`markers`].

#[cfg(test)]
extern crate alloc;

pub mod markers;
mod unique_any;

pub use unique_any_internals::{ALIGNMENT, CAPACITY};

pub use self::unique_any::UniqueAny;
