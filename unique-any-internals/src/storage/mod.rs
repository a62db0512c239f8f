//! Module containing the inline payload storage

mod buffer;
mod raw;
mod vtable;

pub use self::{
    buffer::{ALIGNMENT, CAPACITY},
    raw::RawUniqueAny,
};
