//! Random placement of newly spawned actors.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rol_core::CellCoord;

use crate::Grid;

/// Samples uniformly random cells until an empty one turns up.
///
/// Gives up after `attempts` samples so a full grid cannot stall a turn.
pub(crate) fn random_free_cell(
    grid: &Grid,
    rng: &mut ChaCha8Rng,
    attempts: u32,
) -> Option<CellCoord> {
    let (columns, rows) = grid.dimensions();
    if columns == 0 || rows == 0 {
        return None;
    }
    let columns = i32::try_from(columns).ok()?;
    let rows = i32::try_from(rows).ok()?;

    (0..attempts)
        .map(|_| CellCoord::new(rng.gen_range(0..columns), rng.gen_range(0..rows)))
        .find(|cell| grid.query_occupant(*cell, None).is_empty())
}
