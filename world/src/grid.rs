//! Dense, bounds-checked storage for board cells.

use robots_core::{BoardView, CellContent, ConfigError, EngineError, Position};

/// Fixed-size board of cell contents stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Grid {
    rows: u32,
    columns: u32,
    cells: Vec<CellContent>,
}

impl Grid {
    /// Creates a grid of the provided dimensions with every cell empty.
    pub(crate) fn new(rows: u32, columns: u32) -> Result<Self, EngineError> {
        let capacity = u64::from(rows) * u64::from(columns);
        let cells = usize::try_from(capacity).map_err(|_| ConfigError::TooLarge { capacity })?;
        Ok(Self {
            rows,
            columns,
            cells: vec![CellContent::Empty; cells],
        })
    }

    /// Returns the contents of the provided cell.
    pub(crate) fn get(&self, position: Position) -> Result<CellContent, EngineError> {
        let index = self.index(position)?;
        self.cells
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_bounds(position))
    }

    /// Overwrites the contents of the provided cell.
    pub(crate) fn set(
        &mut self,
        position: Position,
        content: CellContent,
    ) -> Result<(), EngineError> {
        let index = self.index(position)?;
        let error = self.out_of_bounds(position);
        let slot = self.cells.get_mut(index).ok_or(error)?;
        *slot = content;
        Ok(())
    }

    /// Provides the `(rows, columns)` dimensions of the grid.
    #[must_use]
    pub(crate) const fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    /// Borrows the grid as a read-only view.
    #[must_use]
    pub(crate) fn view(&self) -> BoardView<'_> {
        BoardView::new(&self.cells, self.rows, self.columns)
    }

    /// Cell contents in row-major order.
    #[must_use]
    pub(crate) fn cells(&self) -> &[CellContent] {
        &self.cells
    }

    fn out_of_bounds(&self, position: Position) -> EngineError {
        EngineError::OutOfBounds {
            position,
            rows: self.rows,
            columns: self.columns,
        }
    }

    fn index(&self, position: Position) -> Result<usize, EngineError> {
        let out_of_bounds = self.out_of_bounds(position);
        if position.row() >= self.rows || position.column() >= self.columns {
            return Err(out_of_bounds);
        }
        let row = usize::try_from(position.row()).map_err(|_| out_of_bounds)?;
        let column = usize::try_from(position.column()).map_err(|_| out_of_bounds)?;
        let width = usize::try_from(self.columns).map_err(|_| out_of_bounds)?;
        Ok(row * width + column)
    }
}
