//! Range copies into output and bidirectional cursors.

use super::motion::unreachable_on;
use crate::cursor::{BidirectionalCursor, ForwardCursor, OutputCursor};
use crate::error::{Result, Violation};

/// Copies `[first, last)` into `result` front to back.
///
/// Returns `result` positioned after the last written value.
///
/// # Errors
///
/// `Unreachable` when `first` never meets `last`. Values written before the
/// failure stay written.
pub fn copy<I, O>(mut first: I, last: &I, mut result: O) -> Result<O>
where
    I: ForwardCursor,
    O: OutputCursor<Item = I::Item>,
{
    while !first.equals(last) {
        result.set(first.value()?)?;
        result.step()?;
        first.step().map_err(unreachable_on(Violation::PastEnd, "copy"))?;
    }
    Ok(result)
}

/// Copies `[first, last)` back to front so that the range ends just before
/// `result`. Safe when the destination overlaps the tail of the source.
///
/// Returns `result` positioned on the first written value.
///
/// # Errors
///
/// `Unreachable` when `last` rewinds past its begin without meeting `first`.
/// `BeforeBegin` when the destination has too little room.
pub fn copy_backward<I, R>(first: &I, mut last: I, mut result: R) -> Result<R>
where
    I: BidirectionalCursor,
    R: BidirectionalCursor<Item = I::Item>,
{
    while !last.equals(first) {
        last.step_back().map_err(unreachable_on(Violation::BeforeBegin, "copy_backward"))?;
        result.step_back()?;
        result.set_value(last.value()?)?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{IndexableContainer, SequenceContainer, Vector};
    use crate::cursor::{overwrite, IndexableCursor};

    #[test]
    fn copy_overwrites_destination_in_order() {
        let src: Vector<i32> = [1, 2, 3].into_iter().collect();
        let dst: Vector<i32> = [0; 4].into_iter().collect();
        let out = copy(src.begin(), &src.end(), overwrite(dst.begin())).unwrap();
        assert_eq!(dst.to_vec(), vec![1, 2, 3, 0]);
        assert_eq!(out.into_inner().index(), 3);
    }

    #[test]
    fn copy_backward_shifts_within_one_vector() {
        let v: Vector<i32> = [1, 2, 3, 0].into_iter().collect();
        let mut last = v.begin();
        last.jump(3).unwrap();
        let out = copy_backward(&v.begin(), last, v.end()).unwrap();
        assert_eq!(v.to_vec(), vec![1, 1, 2, 3]);
        assert_eq!(out.index(), 1);
    }

    #[test]
    fn copy_backward_reports_short_destination() {
        let src: Vector<i32> = [1, 2, 3].into_iter().collect();
        let dst: Vector<i32> = [0, 0].into_iter().collect();
        let err = copy_backward(&src.begin(), src.end(), dst.end()).unwrap_err();
        assert_eq!(err.violation(), Some(&Violation::BeforeBegin));
        assert_eq!(dst.at(0).unwrap(), 2);
        assert_eq!(dst.at(1).unwrap(), 3);
    }
}
