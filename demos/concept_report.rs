//! Prints the composed shape of every container and cursor type.
//!
//! Run with: cargo run --example concept_report

use tola_cursors::concept::{conforms, shape_of, Composed, ConceptTag};
use tola_cursors::container::{ListCursor, SegmentCursor};
use tola_cursors::cursor::{ByteCursor, IndexCursor};
use tola_cursors::prelude::*;
use tola_cursors::CompositionError;

fn report<T: Composed>() -> Result<(), CompositionError> {
    print!("{}", shape_of::<T>()?);
    Ok(())
}

fn row<T: Composed>(label: &str) {
    fn mark<T: Composed, C: ConceptTag>() -> &'static str {
        if conforms::<T, C>() { "x" } else { "." }
    }
    println!(
        "{label:<14} {:^5} {:^5} {:^5} {:^5} {:^5} {:^5}",
        mark::<T, concepts::SequenceContainer>(),
        mark::<T, concepts::PrologContainer>(),
        mark::<T, concepts::RewindContainer>(),
        mark::<T, concepts::IndexableContainer>(),
        mark::<T, concepts::ContiguousContainer>(),
        mark::<T, concepts::SegmentContainer>(),
    );
}

fn main() -> Result<(), CompositionError> {
    report::<Vector<i32>>()?;
    report::<ForwardList<i32>>()?;
    report::<ByteBuffer>()?;
    report::<Segmented<i32>>()?;
    report::<IndexCursor<Vec<i32>>>()?;
    report::<ListCursor<i32>>()?;
    report::<ByteCursor>()?;
    report::<SegmentCursor<i32>>()?;

    println!();
    println!("{:<14} {:^5} {:^5} {:^5} {:^5} {:^5} {:^5}", "", "seq", "prol", "rew", "idx", "cont", "seg");
    row::<Vector<i32>>("Vector");
    row::<Deque<i32>>("Deque");
    row::<ForwardList<i32>>("ForwardList");
    row::<ByteBuffer>("ByteBuffer");
    row::<Segmented<i32>>("Segmented");
    Ok(())
}
