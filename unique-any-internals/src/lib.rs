#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`unique-any`].
//!
//! # Overview
//!
//! This crate contains the inline storage buffer, the per-payload vtable and
//! the unsafe move/assign/destroy protocol that power the [`unique-any`]
//! container. Nothing in here allocates.
//!
//! **This crate is an implementation detail.** No semantic versioning
//! guarantees are provided. Users should depend on the [`unique-any`] crate,
//! not this one.
//!
//! # Architecture
//!
//! - [`InlineBuffer`]: `CAPACITY` bytes of possibly uninitialized storage,
//!   aligned to `ALIGNMENT`. Writing a payload that does not fit is a
//!   compile-time error.
//! - [`PayloadVtable`]: the `drop` and `relocate` function pointers for one
//!   concrete payload type, created as a `&'static` constant per type.
//! - [`RawUniqueAny`]: a buffer paired with an optional vtable. The vtable
//!   slot doubles as the occupancy flag: it is `None` exactly when no payload
//!   is live.
//!
//! # Safety Strategy
//!
//! When a payload of type `P` is written into the buffer its concrete type is
//! forgotten. The container remains sound because:
//!
//! - **Module-based encapsulation**: the vtable slot and the buffer are
//!   private to [`storage::raw`], and every path that writes one also writes
//!   the other. The vtable can therefore never disagree with the live
//!   payload.
//! - **Compile-time layout checks**: size and alignment are checked in an
//!   inline `const` block at the single place a payload is written.
//! - **Documented vtable contracts**: each vtable method states exactly when
//!   it may be called.
//!
//! [`unique-any`]: https://docs.rs/unique-any/latest/unique_any/
//! [`InlineBuffer`]: storage::buffer::InlineBuffer
//! [`PayloadVtable`]: storage::vtable::PayloadVtable
//! [`storage::raw`]: storage::raw

#[cfg(test)]
extern crate alloc;

mod storage;
mod util;

pub use storage::{ALIGNMENT, CAPACITY, RawUniqueAny};
