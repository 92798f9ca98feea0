#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Random placement system that picks empty cells for robots and teleports.

use rand::Rng;
use robots_core::{BoardView, EngineError, Position};

/// Samples uniformly random cells until one of them is empty.
///
/// Fails with [`EngineError::NoSpaceAvailable`] instead of sampling forever
/// when the board holds no empty cell at all.
pub fn pick_empty_cell<R>(board: BoardView<'_>, rng: &mut R) -> Result<Position, EngineError>
where
    R: Rng + ?Sized,
{
    if !board.has_empty_cell() {
        return Err(EngineError::NoSpaceAvailable);
    }

    let (rows, columns) = board.dimensions();
    loop {
        let candidate = Position::new(rng.gen_range(0..rows), rng.gen_range(0..columns));
        if board.is_empty(candidate) {
            return Ok(candidate);
        }
    }
}
