//! Dense occupancy grid backing every collision query.

use rol_core::{CellCoord, CellQuery, EntityId};

/// Fixed-size table mapping each cell to at most one occupant.
///
/// The grid is the single source of truth for whether a cell is busy; the
/// cell cached on each game object must always agree with it.
#[derive(Clone, Debug)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<Option<EntityId>>,
}

impl Grid {
    /// Creates an empty grid spanning `columns` by `rows` cells.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
        }
    }

    /// Provides the dimensions of the grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Reports whether the cell lies inside `[0, columns) x [0, rows)`.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Returns the entity stored at the cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<EntityId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Stores `entity` at the cell, overwriting any previous occupant.
    ///
    /// Callers clear the previous cell of a moving entity first and check
    /// the destination with [`Grid::query_occupant`]; cells outside the grid
    /// are ignored.
    pub fn set_occupant(&mut self, cell: CellCoord, entity: EntityId) {
        if let Some(slot) = self.slot_mut(cell) {
            *slot = Some(entity);
        }
    }

    /// Marks the cell as empty.
    pub fn clear_occupant(&mut self, cell: CellCoord) {
        if let Some(slot) = self.slot_mut(cell) {
            *slot = None;
        }
    }

    /// Classifies the cell relative to the asking entity.
    ///
    /// Cells held by the asking entity itself resolve as empty so an entity
    /// can re-validate its own cell. The occupant's `solid` flag is not
    /// consulted; interpreting a busy cell is the engine's job.
    #[must_use]
    pub fn query_occupant(&self, cell: CellCoord, asking: Option<EntityId>) -> CellQuery {
        let Some(index) = self.index(cell) else {
            return CellQuery::out_of_bounds();
        };

        match self.cells.get(index).copied().flatten() {
            Some(occupant) if Some(occupant) != asking => CellQuery::busy(occupant),
            _ => CellQuery::empty(),
        }
    }

    /// Iterates over every occupied cell together with its occupant.
    pub fn occupied(&self) -> impl Iterator<Item = (CellCoord, EntityId)> + '_ {
        let width = self.columns.max(1) as usize;
        self.cells.iter().enumerate().filter_map(move |(index, slot)| {
            let occupant = (*slot)?;
            let x = i32::try_from(index % width).ok()?;
            let y = i32::try_from(index / width).ok()?;
            Some((CellCoord::new(x, y), occupant))
        })
    }

    fn slot_mut(&mut self, cell: CellCoord) -> Option<&mut Option<EntityId>> {
        let index = self.index(cell)?;
        self.cells.get_mut(index)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.x()).ok()?;
        let row = u32::try_from(cell.y()).ok()?;
        if column < self.columns && row < self.rows {
            let row = usize::try_from(row).ok()?;
            let column = usize::try_from(column).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
