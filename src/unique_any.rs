use unique_any_internals::RawUniqueAny;

use crate::markers::{Local, PayloadMarkerFor, SendSync};

/// FIXME: Replace this module with an unsafe `raw` field once
/// rust-lang/rust#132922 is resolved.
mod limit_field_access {
    use core::marker::PhantomData;

    use unique_any_internals::RawUniqueAny;

    use crate::markers::Local;

    /// A move-only container that holds at most one value of any type, stored
    /// inline without allocating.
    ///
    /// The payload may be any sized `'static` type whose size is at most
    /// [`CAPACITY`] bytes and whose alignment divides [`ALIGNMENT`]. Payloads
    /// outside those limits are rejected at compile time.
    ///
    /// The container never copies its payload. It can be moved like any Rust
    /// value, emptied into a new container with [`take`], or have its payload
    /// replaced with [`set`] and [`move_from`]. It does not remember the type
    /// of its payload in a way that can be queried: reading the payload back
    /// with [`get_unchecked`] requires the caller to know the type.
    ///
    /// # Type Parameters
    /// - `ThreadSafety`: The thread safety marker for the container. This can
    ///   either be [`Local`] (the default) or [`SendSync`].
    ///
    /// [`CAPACITY`]: crate::CAPACITY
    /// [`ALIGNMENT`]: crate::ALIGNMENT
    /// [`take`]: UniqueAny::take
    /// [`set`]: UniqueAny::set
    /// [`move_from`]: UniqueAny::move_from
    /// [`get_unchecked`]: UniqueAny::get_unchecked
    /// [`SendSync`]: crate::markers::SendSync
    #[repr(transparent)]
    pub struct UniqueAny<ThreadSafety: 'static = Local> {
        /// # Safety
        ///
        /// The following safety invariants are guaranteed to be upheld as long
        /// as this struct exists:
        ///
        /// 1. If `ThreadSafety = SendSync`: the payload held by the
        ///    [`RawUniqueAny`], if any, must be `Send + Sync`.
        raw: RawUniqueAny,
        _thread_safety: PhantomData<ThreadSafety>,
    }

    impl<T> UniqueAny<T> {
        /// Creates a new container from a raw container
        ///
        /// # Safety
        ///
        /// The caller must ensure:
        ///
        /// 1. If `T = SendSync`: the payload held by the [`RawUniqueAny`], if
        ///    any, must be `Send + Sync`.
        #[must_use]
        pub(crate) const unsafe fn from_raw(raw: RawUniqueAny) -> Self {
            // SAFETY: We must uphold the safety invariants of the raw field:
            // 1. Guaranteed by caller
            UniqueAny {
                raw,
                _thread_safety: PhantomData,
            }
        }

        /// Consumes the [`UniqueAny`] and returns the inner [`RawUniqueAny`].
        #[must_use]
        pub(crate) fn into_raw(self) -> RawUniqueAny {
            // SAFETY: We are destroying `self`, so we no longer
            // need to uphold any safety invariants.
            self.raw
        }

        /// Returns a reference to the inner [`RawUniqueAny`].
        #[must_use]
        pub(crate) fn as_raw(&self) -> &RawUniqueAny {
            // SAFETY: We must uphold the safety invariants of the raw field:
            // 1. No payload can be stored through a shared reference.
            &self.raw
        }

        /// Returns a mutable reference to the inner [`RawUniqueAny`].
        ///
        /// # Safety
        ///
        /// The caller must ensure:
        ///
        /// 1. If `T = SendSync`: any payload stored through the returned
        ///    reference must be `Send + Sync`.
        #[must_use]
        pub(crate) unsafe fn as_raw_mut(&mut self) -> &mut RawUniqueAny {
            // SAFETY: We must uphold the safety invariants of the raw field:
            // 1. Guaranteed by the caller
            &mut self.raw
        }
    }
}
pub use limit_field_access::UniqueAny;

impl<T> UniqueAny<T> {
    /// Creates a container holding `payload`.
    ///
    /// # Examples
    ///
    /// ```
    /// use unique_any::UniqueAny;
    ///
    /// struct MoveOnly {
    ///     value: i32,
    /// }
    ///
    /// let any: UniqueAny = UniqueAny::new(MoveOnly { value: 5 });
    /// // SAFETY: the container holds a `MoveOnly`
    /// assert_eq!(unsafe { any.get_unchecked::<MoveOnly>() }.value, 5);
    /// ```
    ///
    /// Payloads larger than [`CAPACITY`](crate::CAPACITY) do not compile:
    ///
    /// ```compile_fail
    /// use unique_any::{CAPACITY, UniqueAny};
    ///
    /// let any: UniqueAny = UniqueAny::new([0u8; CAPACITY + 1]);
    /// ```
    #[must_use]
    pub fn new<P>(payload: P) -> Self
    where
        P: PayloadMarkerFor<T>,
    {
        let raw = RawUniqueAny::new(payload);
        // SAFETY:
        // 1. If `T = SendSync`, then `P: PayloadMarkerFor<SendSync>` implies `P: Send
        //    + Sync`.
        unsafe { Self::from_raw(raw) }
    }

    /// Creates a container holding no payload.
    ///
    /// This is the state a container is left in after its payload has been
    /// moved out with [`take`](UniqueAny::take) or
    /// [`move_from`](UniqueAny::move_from).
    ///
    /// # Examples
    ///
    /// ```
    /// use unique_any::UniqueAny;
    ///
    /// let any: UniqueAny = UniqueAny::empty();
    /// assert!(any.is_empty());
    /// ```
    #[must_use]
    pub const fn empty() -> Self {
        // SAFETY:
        // 1. There is no payload.
        unsafe { Self::from_raw(RawUniqueAny::empty()) }
    }

    /// Returns `true` if the container holds no payload.
    ///
    /// This is the only thing that can be asked about the payload without
    /// knowing its type.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_raw().is_empty()
    }

    /// Drops the current payload, if any, and stores `payload` in its place.
    ///
    /// The new payload does not need to have the same type as the old one.
    ///
    /// # Examples
    ///
    /// ```
    /// use unique_any::UniqueAny;
    ///
    /// let mut any: UniqueAny = UniqueAny::new(String::from("text"));
    /// any.set(23.5f32);
    /// // SAFETY: the container now holds an `f32`
    /// assert_eq!(unsafe { *any.get_unchecked::<f32>() }, 23.5);
    /// ```
    pub fn set<P>(&mut self, payload: P)
    where
        P: PayloadMarkerFor<T>,
    {
        // SAFETY:
        // 1. If `T = SendSync`, then `P: PayloadMarkerFor<SendSync>` implies `P: Send
        //    + Sync`.
        let raw = unsafe { self.as_raw_mut() };
        raw.set(payload);
    }

    /// Drops the current payload, if any, leaving the container empty.
    ///
    /// Calling this on an empty container does nothing.
    pub fn clear(&mut self) {
        // SAFETY:
        // 1. Clearing stores no payload.
        let raw = unsafe { self.as_raw_mut() };
        raw.clear();
    }

    /// Drops the current payload, if any, then moves the payload of `other`
    /// into this container, leaving `other` empty.
    ///
    /// If `other` is empty this container ends up empty as well. Moving a
    /// container into itself is ruled out by the borrow checker.
    ///
    /// # Examples
    ///
    /// ```
    /// use unique_any::UniqueAny;
    ///
    /// let mut target: UniqueAny = UniqueAny::new(1u8);
    /// let mut source: UniqueAny = UniqueAny::new(String::from("moved"));
    ///
    /// target.move_from(&mut source);
    /// assert!(source.is_empty());
    /// // SAFETY: the target now holds the `String`
    /// assert_eq!(unsafe { target.get_unchecked::<String>() }, "moved");
    /// ```
    pub fn move_from(&mut self, other: &mut Self) {
        // SAFETY:
        // 1. If `T = SendSync`, the payload stored comes from `other`, which is a
        //    `UniqueAny<SendSync>` as well and so only holds `Send + Sync` payloads.
        let raw = unsafe { self.as_raw_mut() };
        // SAFETY:
        // 1. Moving out of `other` stores no payload in it.
        let other_raw = unsafe { other.as_raw_mut() };
        raw.move_from(other_raw);
    }

    /// Moves the payload out of this container into a new one, leaving this
    /// one empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use unique_any::UniqueAny;
    ///
    /// let mut source: UniqueAny = UniqueAny::new(vec![1, 2, 3]);
    /// let taken = source.take();
    ///
    /// assert!(source.is_empty());
    /// // SAFETY: the new container holds the `Vec<i32>`
    /// assert_eq!(unsafe { taken.get_unchecked::<Vec<i32>>() }, &[1, 2, 3]);
    /// ```
    #[must_use]
    pub fn take(&mut self) -> Self {
        // SAFETY:
        // 1. Moving out of `self` stores no payload in it.
        let raw = unsafe { self.as_raw_mut() };
        let taken = raw.take();
        // SAFETY:
        // 1. The payload comes from a `UniqueAny<T>`, so it already satisfies the
        //    requirement for `T`.
        unsafe { Self::from_raw(taken) }
    }

    /// Returns a reference to the payload, assuming it is a `P`.
    ///
    /// No check is made in release builds. Debug builds assert that the
    /// payload type matches.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The container holds a payload.
    /// 2. The type `P` is the type of that payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use unique_any::UniqueAny;
    ///
    /// let any: UniqueAny = UniqueAny::new(23.5f32);
    /// // SAFETY: the container holds an `f32`
    /// let value: &f32 = unsafe { any.get_unchecked::<f32>() };
    /// assert_eq!(*value, 23.5);
    /// ```
    #[must_use]
    pub unsafe fn get_unchecked<P: 'static>(&self) -> &P {
        // SAFETY:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { self.as_raw().payload_unchecked::<P>() }
    }

    /// Returns a mutable reference to the payload, assuming it is a `P`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The container holds a payload.
    /// 2. The type `P` is the type of that payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use unique_any::UniqueAny;
    ///
    /// let mut any: UniqueAny = UniqueAny::new(String::from("hello"));
    /// // SAFETY: the container holds a `String`
    /// unsafe { any.get_unchecked_mut::<String>() }.push_str(", world");
    /// // SAFETY: the container holds a `String`
    /// assert_eq!(unsafe { any.get_unchecked::<String>() }, "hello, world");
    /// ```
    #[must_use]
    pub unsafe fn get_unchecked_mut<P: 'static>(&mut self) -> &mut P {
        // SAFETY:
        // 1. Replacing the payload in place with another `P` keeps it the type
        //    the container was given, which satisfies the marker already.
        let raw = unsafe { self.as_raw_mut() };
        // SAFETY:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { raw.payload_unchecked_mut::<P>() }
    }

    /// Moves the payload out, assuming it is a `P`, and leaves the container
    /// empty.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The container holds a payload.
    /// 2. The type `P` is the type of that payload.
    #[must_use]
    pub unsafe fn take_unchecked<P: 'static>(&mut self) -> P {
        // SAFETY:
        // 1. Moving out of `self` stores no payload in it.
        let raw = unsafe { self.as_raw_mut() };
        // SAFETY:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { raw.take_unchecked::<P>() }
    }

    /// Consumes the container and returns its payload, assuming it is a `P`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The container holds a payload.
    /// 2. The type `P` is the type of that payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use unique_any::UniqueAny;
    ///
    /// let any: UniqueAny = UniqueAny::new(String::from("owned"));
    /// // SAFETY: the container holds a `String`
    /// let value: String = unsafe { any.into_inner_unchecked() };
    /// assert_eq!(value, "owned");
    /// ```
    #[must_use]
    pub unsafe fn into_inner_unchecked<P: 'static>(self) -> P {
        let mut raw = self.into_raw();
        // SAFETY:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { raw.take_unchecked::<P>() }
    }
}

impl<T> Default for UniqueAny<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> core::fmt::Debug for UniqueAny<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UniqueAny")
            .field("occupied", &!self.is_empty())
            .finish_non_exhaustive()
    }
}

impl UniqueAny<SendSync> {
    /// Creates a new [`UniqueAny`] with [`SendSync`] thread safety.
    ///
    /// This is a convenience method that calls [`UniqueAny::new`] with
    /// explicit [`SendSync`] thread safety. Use this method when you're
    /// having trouble with type inference for the thread safety parameter.
    #[must_use]
    pub fn new_sendsync<P>(payload: P) -> Self
    where
        P: Send + Sync + 'static,
    {
        Self::new(payload)
    }

    /// Converts the container to a [`Local`] one.
    ///
    /// # Examples
    ///
    /// ```
    /// use unique_any::{UniqueAny, markers::{Local, SendSync}};
    ///
    /// let shared: UniqueAny<SendSync> = UniqueAny::new(5u32);
    /// let mut local: UniqueAny<Local> = shared.into_local();
    /// local.set(std::rc::Rc::new(6u32));
    /// ```
    #[must_use]
    pub fn into_local(self) -> UniqueAny<Local> {
        let raw = self.into_raw();
        // SAFETY:
        // 1. `T = Local`, so there is no requirement on the payload.
        unsafe { UniqueAny::<Local>::from_raw(raw) }
    }
}

impl UniqueAny<Local> {
    /// Creates a new [`UniqueAny`] with [`Local`] thread safety.
    ///
    /// This is a convenience method that calls [`UniqueAny::new`] with
    /// explicit [`Local`] thread safety. Use this method when you're having
    /// trouble with type inference for the thread safety parameter.
    #[must_use]
    pub fn new_local<P: 'static>(payload: P) -> Self {
        Self::new(payload)
    }
}

impl From<UniqueAny<SendSync>> for UniqueAny<Local> {
    fn from(any: UniqueAny<SendSync>) -> Self {
        any.into_local()
    }
}

// SAFETY: The `SendSync` marker indicates that the payload, if any, is
// `Send`+`Sync`. The container owns nothing else, so it is safe to implement
// `Send`+`Sync` for the container itself.
unsafe impl Send for UniqueAny<SendSync> {}

// SAFETY: The `SendSync` marker indicates that the payload, if any, is
// `Send`+`Sync`. The container owns nothing else, so it is safe to implement
// `Send`+`Sync` for the container itself.
unsafe impl Sync for UniqueAny<SendSync> {}
