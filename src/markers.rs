//! Marker types and traits for the thread-safety of a [`UniqueAny`].
//!
//! A [`UniqueAny`] forgets the type of its payload, and with it whether the
//! payload may cross thread boundaries. The thread-safety marker, the type
//! parameter of [`UniqueAny<ThreadSafety>`], records that fact at the type
//! level instead:
//!
//! - [`Local`] (the default): any payload is accepted, and the container is
//!   neither `Send` nor `Sync`.
//! - [`SendSync`]: only `Send + Sync` payloads are accepted, and the container
//!   is `Send + Sync` itself.
//!
//! The constraint is enforced at construction time through
//! [`PayloadMarkerFor`]. It is impossible to put a payload into a
//! `UniqueAny<SendSync>` that is not `Send + Sync`, so a
//! `UniqueAny<SendSync>` can be trusted to be thread-safe.
//!
//! # Examples
//!
//! ```
//! use std::rc::Rc;
//!
//! use unique_any::{UniqueAny, markers::{Local, SendSync}};
//!
//! // Rc is not Send or Sync, so it needs a Local container
//! let local: UniqueAny<Local> = UniqueAny::new(Rc::new(5u32));
//!
//! // A String can go into a SendSync container and cross threads
//! let shared: UniqueAny<SendSync> = UniqueAny::new(String::from("hello"));
//! std::thread::spawn(move || {
//!     // SAFETY: the container holds a `String`
//!     assert_eq!(unsafe { shared.get_unchecked::<String>() }, "hello");
//! })
//! .join()
//! .unwrap();
//! # drop(local);
//! ```
//!
//! [`UniqueAny`]: crate::UniqueAny
//! [`UniqueAny<ThreadSafety>`]: crate::UniqueAny

/// Marker type indicating that a container and its payload are `Send + Sync`.
///
/// # Examples
///
/// ```
/// use unique_any::{UniqueAny, markers::SendSync};
///
/// let any: UniqueAny<SendSync> = UniqueAny::new(42u64);
/// std::thread::spawn(move || drop(any)).join().unwrap();
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct SendSync;

/// Marker type indicating that a container may hold a payload that is not
/// `Send` or `Sync`.
///
/// This is the default thread-safety marker of [`UniqueAny`]. Use it for
/// payloads such as `Rc<T>`, raw pointers, or anything else that opts out of
/// `Send`/`Sync`.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
///
/// use unique_any::UniqueAny;
///
/// let any: UniqueAny = UniqueAny::new(Rc::new("shared locally"));
///
/// // Not Send, so this would not compile:
/// // std::thread::spawn(move || drop(any));
/// # drop(any);
/// ```
///
/// [`UniqueAny`]: crate::UniqueAny
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Local;

mod sealed_payload_marker {
    use super::*;

    pub trait Sealed<T>: 'static {}

    impl<P: Sized + 'static> Sealed<Local> for P {}
    impl<P: Sized + Send + Sync + 'static> Sealed<SendSync> for P {}
}

/// Marker trait for payload types that may be stored in a container with
/// thread-safety marker `T`.
///
/// Every sized `'static` type is a payload for [`Local`]. Only types that are
/// also `Send + Sync` are payloads for [`SendSync`]. The trait is sealed, so
/// these are the only implementations.
///
/// ```compile_fail
/// use std::rc::Rc;
///
/// use unique_any::{UniqueAny, markers::SendSync};
///
/// // This won't compile because Rc is not Send + Sync
/// let any: UniqueAny<SendSync> = UniqueAny::new(Rc::new(5u32));
/// ```
pub trait PayloadMarkerFor<T>: sealed_payload_marker::Sealed<T> + Sized + 'static {}

impl<P: Sized + 'static> PayloadMarkerFor<Local> for P {}

impl<P: Sized + Send + Sync + 'static> PayloadMarkerFor<SendSync> for P {}
