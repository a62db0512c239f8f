//! Basic usage of `UniqueAny`: store a move-only value, read it back, then
//! replace it with a value of a different type in the same container.

use unique_any::UniqueAny;

struct NonCopyable {
    value: i32,
}

impl Drop for NonCopyable {
    fn drop(&mut self) {
        println!("dropping NonCopyable({})", self.value);
    }
}

fn main() {
    let mut any: UniqueAny = UniqueAny::new(NonCopyable { value: 5 });
    // SAFETY: the container holds a `NonCopyable`
    println!("{}", unsafe { any.get_unchecked::<NonCopyable>() }.value);

    // The `NonCopyable` is dropped before the float takes its place
    any.set(23.5f32);
    // SAFETY: the container now holds an `f32`
    println!("{}", unsafe { any.get_unchecked::<f32>() });

    // Moving the payload into a new container leaves the old one empty
    let moved = any.take();
    println!("source empty: {}, target empty: {}", any.is_empty(), moved.is_empty());
}
