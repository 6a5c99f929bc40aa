use grid_snake_core::Cell;

/// Ordered cells occupied by the snake, head first.
///
/// Segments follow the head like a shift register: on every advance each
/// segment takes the cell its predecessor held before the move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BodyChain {
    cells: Vec<Cell>,
}

impl BodyChain {
    /// Creates a chain consisting of a bare head.
    #[must_use]
    pub fn new(head: Cell) -> Self {
        Self { cells: vec![head] }
    }

    /// Creates a chain from explicit cells, head first.
    ///
    /// Returns `None` when `cells` is empty because a chain always has a head.
    #[must_use]
    pub fn from_cells(cells: Vec<Cell>) -> Option<Self> {
        if cells.is_empty() {
            return None;
        }
        Some(Self { cells })
    }

    /// Cell currently occupied by the head.
    #[must_use]
    pub fn head(&self) -> Cell {
        self.cells[0]
    }

    /// Every occupied cell, head first.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells trailing the head.
    #[must_use]
    pub fn segments(&self) -> &[Cell] {
        &self.cells[1..]
    }

    /// Number of cells in the chain, head included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: a chain never loses its head.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reports whether any segment behind the head occupies `cell`.
    #[must_use]
    pub fn contains_segment(&self, cell: Cell) -> bool {
        self.segments().contains(&cell)
    }

    /// Moves the head to `new_head` and drags every segment one place forward.
    pub fn advance(&mut self, new_head: Cell) {
        for index in (1..self.cells.len()).rev() {
            self.cells[index] = self.cells[index - 1];
        }
        self.cells[0] = new_head;
    }

    /// Appends a segment under the current tail and returns its cell.
    ///
    /// The new segment shares the tail's cell until the next advance reveals it.
    pub fn grow(&mut self) -> Cell {
        let tail = self.cells[self.cells.len() - 1];
        self.cells.push(tail);
        tail
    }
}
