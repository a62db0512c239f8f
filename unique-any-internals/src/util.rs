//! Internal utility types.

/// Marker type used as the pointee of type-erased payload pointers.
///
/// A `NonNull<Erased>` points at the first byte of an inline buffer that holds
/// a payload of some concrete type `P`, though the holder of the pointer does
/// not know which `P` it is. Only the vtable paired with the buffer does.
///
/// Using a distinct marker type (rather than `u8` or `()`) makes the intent
/// clearer in signatures and keeps erased pointers from being confused with
/// byte pointers.
pub(crate) struct Erased;
