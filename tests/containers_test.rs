//! Container behaviour through the container traits.

use tola_cursors::container::SegmentCursor;
use tola_cursors::prelude::*;
use tola_cursors::SegmentConfig;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Pushes `1..=n`, then checks the ends and drains from the back.
fn exercise_back<C>(mut container: C, n: i32)
where
    C: RewindContainer<Item = i32>,
{
    assert!(container.is_empty());
    for value in 1..=n {
        container.push(value).unwrap();
    }
    assert_eq!(container.count(), n as usize);
    assert_eq!(container.front().unwrap(), 1);
    assert_eq!(container.back().unwrap(), n);

    let mut drained = Vec::new();
    while !container.is_empty() {
        drained.push(container.pop().unwrap());
    }
    assert_eq!(drained, (1..=n).rev().collect::<Vec<_>>());
    assert!(matches!(container.pop().unwrap_err(), CursorError::EmptyContainer { operation: "pop" }));
}

#[test]
fn rewind_containers_share_back_semantics() {
    init_tracing();
    exercise_back(Vector::new(), 5);
    exercise_back(Deque::new(), 5);
    exercise_back(Segmented::with_config(SegmentConfig { segment_capacity: 2 }), 5);
}

#[test]
fn cursor_walk_visits_every_element_in_order() {
    fn walk<C: SequenceContainer<Item = i32>>(container: &C) -> Vec<i32> {
        let mut out = Vec::new();
        let mut cursor = container.begin();
        let end = container.end();
        while !cursor.equals(&end) {
            out.push(cursor.value().unwrap());
            cursor.step().unwrap();
        }
        out
    }

    let values = vec![4, 8, 15, 16, 23];
    assert_eq!(walk(&values.iter().copied().collect::<Vector<_>>()), values);
    assert_eq!(walk(&values.iter().copied().collect::<Deque<_>>()), values);
    assert_eq!(walk(&values.iter().copied().collect::<ForwardList<_>>()), values);
    assert_eq!(walk(&values.iter().copied().collect::<Segmented<_>>()), values);
}

#[test]
fn stepping_past_the_ends_is_reported() {
    let v: Vector<i32> = [1].into_iter().collect();
    let mut cursor = v.end();
    assert_eq!(cursor.step().unwrap_err().violation(), Some(&Violation::PastEnd));
    assert_eq!(cursor.value().unwrap_err().violation(), Some(&Violation::PastEnd));

    let mut cursor = v.begin();
    assert_eq!(cursor.step_back().unwrap_err().violation(), Some(&Violation::BeforeBegin));
}

#[test]
fn deque_front_insertion_stales_cursors() {
    let mut d: Deque<i32> = [2, 3].into_iter().collect();
    let cursor = d.begin();
    d.unshift(1).unwrap();
    assert_eq!(cursor.value().unwrap_err().violation(), Some(&Violation::StaleCursor));
    assert_eq!(d.begin().value().unwrap(), 1);
}

#[test]
fn indexable_cursor_supports_relative_access() {
    let mut v: Vector<char> = "abcde".chars().collect();
    let mut cursor = v.begin();
    cursor.jump(2).unwrap();
    assert_eq!(cursor.value().unwrap(), 'c');
    assert_eq!(cursor.at(-2).unwrap(), 'a');
    assert_eq!(cursor.at(2).unwrap(), 'e');
    assert_eq!(
        cursor.at(3).unwrap_err().violation(),
        Some(&Violation::IndexOutOfBounds { index: 5, len: 5 })
    );
    cursor.set_at(1, 'D').unwrap();
    assert_eq!(v.at(3).unwrap(), 'D');

    cursor.jump(3).unwrap();
    assert_eq!(cursor, v.end());
    assert!(cursor.jump(1).is_err());

    v.set_at(0, 'A').unwrap();
    assert_eq!(cursor.at(-5).unwrap(), 'A');
}

// =============================================================================
// ForwardList
// =============================================================================

#[test]
fn forward_list_edits_after_a_position() {
    let mut list: ForwardList<&str> = ["b", "d"].into_iter().collect();
    let head = list.before_begin();
    let a = list.insert_after(&head, "a").unwrap();
    let mut b = a.clone();
    b.step().unwrap();
    list.insert_after(&b, "c").unwrap();
    assert_eq!(list.to_vec(), vec!["a", "b", "c", "d"]);

    assert_eq!(list.erase_after(&b).unwrap(), "c");
    assert_eq!(list.to_vec(), vec!["a", "b", "d"]);
    // Cursors to surviving nodes stay valid.
    assert_eq!(a.value().unwrap(), "a");
    assert_eq!(b.value().unwrap(), "b");
}

#[test]
fn forward_list_before_begin_is_not_dereferenceable() {
    let list: ForwardList<i32> = [1].into_iter().collect();
    let head = list.before_begin();
    assert_eq!(head.value().unwrap_err().violation(), Some(&Violation::NotDereferenceable));
    let mut next = head.clone();
    next.step().unwrap();
    assert_eq!(next, list.begin());
}

#[test]
fn forward_list_erased_node_cursor_is_stale() {
    let mut list: ForwardList<i32> = [1, 2, 3].into_iter().collect();
    let mut second = list.begin();
    second.step().unwrap();
    list.erase_after(&list.begin()).unwrap();
    assert_eq!(second.value().unwrap_err().violation(), Some(&Violation::StaleCursor));

    let shifted = list.begin();
    assert_eq!(list.shift().unwrap(), 1);
    assert_eq!(shifted.value().unwrap_err().violation(), Some(&Violation::StaleCursor));
    assert_eq!(list.front().unwrap(), 3);
}

#[test]
fn forward_list_rejects_foreign_positions() {
    let mut mine: ForwardList<i32> = [1].into_iter().collect();
    let theirs: ForwardList<i32> = [1].into_iter().collect();
    let err = mine.insert_after(&theirs.begin(), 2).unwrap_err();
    assert_eq!(err.violation(), Some(&Violation::ForeignCursor));
    let err = mine.erase_after(&mine.end()).unwrap_err();
    assert_eq!(err.violation(), Some(&Violation::PastEnd));
    assert_eq!(mine.to_vec(), vec![1]);
}

#[test]
fn forward_list_clear_invalidates_everything() {
    let mut list: ForwardList<i32> = (0..3).collect();
    let cursor = list.begin();
    list.clear().unwrap();
    assert!(list.is_empty());
    assert_eq!(cursor.value().unwrap_err().violation(), Some(&Violation::StaleCursor));
    list.push_back(9).unwrap();
    assert_eq!(list.to_vec(), vec![9]);
}

// =============================================================================
// Segmented
// =============================================================================

#[test]
fn segmented_fills_segments_in_order() {
    init_tracing();
    let mut s: Segmented<i32> = Segmented::with_config(SegmentConfig { segment_capacity: 2 });
    for value in 0..5 {
        s.push(value).unwrap();
    }
    assert_eq!(s.segment_count(), 3);
    assert_eq!(s.segment_lengths(), vec![2, 2, 1]);
    assert_eq!(s.segment_len(2).unwrap(), 1);
    assert_eq!(
        s.segment_len(3).unwrap_err().violation(),
        Some(&Violation::IndexOutOfBounds { index: 3, len: 3 })
    );

    assert_eq!(s.pop().unwrap(), 4);
    assert_eq!(s.segment_lengths(), vec![2, 2]);
}

#[test]
fn segment_cursor_crosses_segments_both_ways() {
    let s: Segmented<i32> = {
        let mut s = Segmented::with_config(SegmentConfig { segment_capacity: 2 });
        for value in 0..5 {
            s.push(value).unwrap();
        }
        s
    };
    let mut cursor: SegmentCursor<i32> = s.end();
    let mut seen = Vec::new();
    while cursor != s.begin() {
        cursor.step_back().unwrap();
        seen.push(cursor.value().unwrap());
    }
    assert_eq!(seen, vec![4, 3, 2, 1, 0]);
    assert_eq!(cursor.step_back().unwrap_err().violation(), Some(&Violation::BeforeBegin));
}

#[test]
fn segmented_push_stales_cursors_and_front_ops_are_stubs() {
    let mut s: Segmented<i32> = (0..3).collect();
    let cursor = s.begin();
    s.push(3).unwrap();
    assert_eq!(cursor.value().unwrap_err().violation(), Some(&Violation::StaleCursor));
    assert!(matches!(s.unshift(0).unwrap_err(), CursorError::Unsupported { operation: "unshift", .. }));
    assert!(matches!(s.shift().unwrap_err(), CursorError::Unsupported { operation: "shift", .. }));
}

#[test]
fn zero_segment_capacity_is_treated_as_one() {
    let mut s: Segmented<u8> = Segmented::with_config(SegmentConfig { segment_capacity: 0 });
    s.push(1).unwrap();
    s.push(2).unwrap();
    assert_eq!(s.config().segment_capacity, 1);
    assert_eq!(s.segment_lengths(), vec![1, 1]);
}

// =============================================================================
// Release
// =============================================================================

fn assert_released<C: ForwardCursor>(cursor: &C)
where
    C::Item: std::fmt::Debug,
{
    assert_eq!(cursor.value().unwrap_err().violation(), Some(&Violation::ContainerReleased));
    assert_eq!(cursor.clone().step().unwrap_err().violation(), Some(&Violation::ContainerReleased));
}

#[test]
fn release_invalidates_cursors_of_every_container() {
    init_tracing();
    let v: Vector<i32> = (0..3).collect();
    let cursor = v.begin();
    v.release();
    assert_released(&cursor);

    let d: Deque<i32> = (0..3).collect();
    let cursor = d.end();
    d.release();
    assert_eq!(cursor.clone().step_back().unwrap_err().violation(), Some(&Violation::ContainerReleased));

    let list: ForwardList<i32> = (0..3).collect();
    let (cursor, head) = (list.begin(), list.before_begin());
    list.release();
    assert_released(&cursor);
    assert_released(&head);

    let s: Segmented<i32> = (0..5).collect();
    let cursor = s.begin();
    s.release();
    assert_released(&cursor);
}

#[test]
fn release_while_a_view_is_borrowed() {
    let buffer: ByteBuffer = b"frame".as_slice().into();
    let cursor = buffer.begin();
    let view = cursor.data(&buffer.end()).unwrap();
    let guard = view.bytes().unwrap();
    buffer.release();
    assert_eq!(&*guard, b"frame");
    drop(guard);

    assert_released(&cursor);
    assert_eq!(cursor.read_at(0, IntLayout::U8).unwrap_err().violation(), Some(&Violation::ContainerReleased));
    assert_eq!(view.bytes().unwrap_err().violation(), Some(&Violation::ContainerReleased));
}
