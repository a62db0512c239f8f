//! Behavioral tests for [`UniqueAny`]: read-back, reassignment, moves and the
//! exactly-once drop guarantee.

use std::{cell::RefCell, rc::Rc, sync::Arc, thread};

use unique_any::{
    CAPACITY, UniqueAny,
    markers::{Local, SendSync},
};

type DropLog = Rc<RefCell<Vec<String>>>;

/// A payload that can be moved but not copied, and records when it is dropped.
struct NonCopyable {
    value: i32,
    log: DropLog,
}

impl NonCopyable {
    fn new(value: i32, log: &DropLog) -> Self {
        Self {
            value,
            log: log.clone(),
        }
    }
}

impl Drop for NonCopyable {
    fn drop(&mut self) {
        self.log
            .borrow_mut()
            .push(format!("Dropped: NonCopyable({})", self.value));
    }
}

#[test]
fn test_read_back_matches_original() {
    let any: UniqueAny = UniqueAny::new(String::from("payload"));
    // SAFETY: the container holds a `String`
    assert_eq!(unsafe { any.get_unchecked::<String>() }, "payload");

    let any: UniqueAny = UniqueAny::new((1u8, -2i64, 'c'));
    // SAFETY: the container holds a `(u8, i64, char)`
    assert_eq!(unsafe { *any.get_unchecked::<(u8, i64, char)>() }, (1, -2, 'c'));

    let any: UniqueAny = UniqueAny::new([3u64; CAPACITY / 8]);
    // SAFETY: the container holds a `[u64; CAPACITY / 8]`
    assert_eq!(unsafe { any.get_unchecked::<[u64; CAPACITY / 8]>() }, &[3; CAPACITY / 8]);
}

#[test]
fn test_struct_then_float_scenario() {
    let log = DropLog::default();

    let mut any: UniqueAny = UniqueAny::new(NonCopyable::new(5, &log));
    // SAFETY: the container holds a `NonCopyable`
    assert_eq!(unsafe { any.get_unchecked::<NonCopyable>() }.value, 5);

    any.set(23.5f32);
    // SAFETY: the container now holds an `f32`
    assert_eq!(unsafe { *any.get_unchecked::<f32>() }, 23.5);
    assert_eq!(*log.borrow(), ["Dropped: NonCopyable(5)"]);

    drop(any);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn test_move_assign_drops_previous_payload_once() {
    let log = DropLog::default();

    let mut target: UniqueAny = UniqueAny::new(NonCopyable::new(1, &log));
    let mut source: UniqueAny = UniqueAny::new(String::from("incoming"));

    target.move_from(&mut source);
    assert_eq!(*log.borrow(), ["Dropped: NonCopyable(1)"]);
    // SAFETY: the target now holds the `String`
    assert_eq!(unsafe { target.get_unchecked::<String>() }, "incoming");
    assert!(source.is_empty());

    drop(source);
    drop(target);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn test_move_assign_from_empty() {
    let log = DropLog::default();

    let mut target: UniqueAny = UniqueAny::new(NonCopyable::new(2, &log));
    let mut source: UniqueAny = UniqueAny::empty();

    target.move_from(&mut source);
    assert!(target.is_empty());
    assert_eq!(*log.borrow(), ["Dropped: NonCopyable(2)"]);
}

#[test]
fn test_move_construct_reproduces_value() {
    let log = DropLog::default();

    let mut source: UniqueAny = UniqueAny::new(NonCopyable::new(7, &log));
    let taken = source.take();

    // SAFETY: the payload now lives in `taken`
    assert_eq!(unsafe { taken.get_unchecked::<NonCopyable>() }.value, 7);
    assert!(source.is_empty());

    // Neither the moved-from source nor the move itself drops anything
    drop(source);
    assert!(log.borrow().is_empty());
    drop(taken);
    assert_eq!(*log.borrow(), ["Dropped: NonCopyable(7)"]);
}

#[test]
fn test_drop_empty_and_occupied() {
    let log = DropLog::default();

    drop(UniqueAny::<Local>::empty());
    drop(UniqueAny::<Local>::default());
    assert!(log.borrow().is_empty());

    drop(UniqueAny::new_local(NonCopyable::new(3, &log)));
    assert_eq!(*log.borrow(), ["Dropped: NonCopyable(3)"]);
}

#[test]
fn test_clear_is_idempotent() {
    let log = DropLog::default();

    let mut any: UniqueAny = UniqueAny::new(NonCopyable::new(4, &log));
    any.clear();
    any.clear();
    assert!(any.is_empty());
    drop(any);
    assert_eq!(*log.borrow(), ["Dropped: NonCopyable(4)"]);
}

#[test]
fn test_self_move_round_trip_is_noop() {
    let log = DropLog::default();

    let mut any: UniqueAny = UniqueAny::new(NonCopyable::new(6, &log));
    // `any.move_from(&mut any)` is rejected by the borrow checker; moving the
    // payload out and straight back is the closest equivalent.
    any = any.take();

    // SAFETY: the container still holds the `NonCopyable`
    assert_eq!(unsafe { any.get_unchecked::<NonCopyable>() }.value, 6);
    assert!(log.borrow().is_empty());
    drop(any);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn test_take_and_into_inner_unchecked() {
    let log = DropLog::default();

    let mut any: UniqueAny = UniqueAny::new(NonCopyable::new(8, &log));
    // SAFETY: the container holds a `NonCopyable`
    let payload = unsafe { any.take_unchecked::<NonCopyable>() };
    assert!(any.is_empty());
    drop(any);
    assert!(log.borrow().is_empty());
    assert_eq!(payload.value, 8);
    drop(payload);
    assert_eq!(log.borrow().len(), 1);

    let any: UniqueAny = UniqueAny::new(vec![1u8, 2, 3]);
    // SAFETY: the container holds a `Vec<u8>`
    let payload: Vec<u8> = unsafe { any.into_inner_unchecked() };
    assert_eq!(payload, [1, 2, 3]);
}

#[test]
fn test_containers_in_a_collection() {
    let log = DropLog::default();

    let mut slots: Vec<UniqueAny> = (0..4)
        .map(|value| UniqueAny::new(NonCopyable::new(value, &log)))
        .collect();
    // Growing the vector relocates every container bitwise
    slots.reserve(64);
    slots.push(UniqueAny::new(String::from("tail")));

    for (expected, slot) in slots.iter().take(4).enumerate() {
        // SAFETY: the first four slots hold `NonCopyable`s
        assert_eq!(
            unsafe { slot.get_unchecked::<NonCopyable>() }.value,
            expected as i32
        );
    }
    assert!(log.borrow().is_empty());

    drop(slots);
    assert_eq!(log.borrow().len(), 4);
}

#[test]
fn test_sendsync_crosses_threads() {
    let counter = Arc::new(5u32);
    let mut any: UniqueAny<SendSync> = UniqueAny::new(counter.clone());

    let handle = thread::spawn(move || {
        // SAFETY: the container holds an `Arc<u32>`
        let value = **unsafe { any.get_unchecked::<Arc<u32>>() };
        any.set(value + 1);
        any
    });
    let any = handle.join().expect("worker thread panicked");

    // SAFETY: the worker replaced the payload with a `u32`
    assert_eq!(unsafe { *any.get_unchecked::<u32>() }, 6);
    assert_eq!(Arc::strong_count(&counter), 1);
}
