//! Bounded 2D grid with precomputed Moore neighborhoods.

use cellsim_core::{Coord, Error, Result};

/// A cell that can draw itself as a single character
pub trait Cell {
    fn symbol(&self) -> char;
}

/// A bounded rectangular grid of cells.
///
/// Cells are stored row-major (`index = y * width + x`). Neighborhoods are
/// clipped at the edges rather than wrapped, so corner cells have 3
/// neighbors, edge cells 5, and interior cells 8.
#[derive(Debug, Clone)]
pub struct Grid<C> {
    pub width: i32,
    pub height: i32,
    cells: Vec<C>,
    neighbors: Vec<Vec<usize>>,
}

impl<C> Grid<C> {
    pub fn new(width: i32, height: i32) -> Result<Self>
    where
        C: Default,
    {
        Self::from_factory(width, height, |_| C::default())
    }

    /// Build a grid with one factory call per coordinate, row by row
    pub fn from_factory<F>(width: i32, height: i32, mut factory: F) -> Result<Self>
    where
        F: FnMut(Coord) -> C,
    {
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let size = (width * height) as usize;
        let mut cells = Vec::with_capacity(size);
        for index in 0..size {
            let x = (index as i32) % width;
            let y = (index as i32) / width;
            cells.push(factory(Coord::new(x, y)));
        }
        Ok(Self {
            width,
            height,
            cells,
            neighbors: neighbor_lists(width, height),
        })
    }

    /// Convert a coordinate to its flat index, rejecting out-of-range input
    pub fn coord_to_index(&self, coord: Coord) -> Result<usize> {
        if coord.x < 0 || coord.x >= self.width || coord.y < 0 || coord.y >= self.height {
            return Err(Error::OutOfBounds {
                x: coord.x,
                y: coord.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((coord.y * self.width + coord.x) as usize)
    }

    /// Convert a flat index back to its coordinate
    pub fn index_to_coord(&self, index: usize) -> Coord {
        let x = (index as i32) % self.width;
        let y = (index as i32) / self.width;
        Coord::new(x, y)
    }

    /// Get cell by flat index
    pub fn cell(&self, index: usize) -> &C {
        &self.cells[index]
    }

    /// Get mutable cell by flat index
    pub fn cell_mut(&mut self, index: usize) -> &mut C {
        &mut self.cells[index]
    }

    /// Get cell at a coordinate
    pub fn get(&self, coord: Coord) -> Result<&C> {
        let index = self.coord_to_index(coord)?;
        Ok(&self.cells[index])
    }

    /// Get mutable cell at a coordinate
    pub fn get_mut(&mut self, coord: Coord) -> Result<&mut C> {
        let index = self.coord_to_index(coord)?;
        Ok(&mut self.cells[index])
    }

    /// Indices of the cells adjacent to `index`.
    ///
    /// The list is ordered by neighbor x ascending, then y ascending; rules
    /// that scan for the "first" matching neighbor depend on this order.
    pub fn neighbor_indices(&self, index: usize) -> &[usize] {
        &self.neighbors[index]
    }

    /// Visit every cell in index order (y ascending, then x ascending).
    ///
    /// The callback receives the grid itself so a rule can read and write
    /// cells other than the one being visited.
    pub fn for_each_cell<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Self, usize),
    {
        for index in 0..self.cells.len() {
            f(self, index);
        }
    }

    /// Iterator over all cells with their coordinates
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &C)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_coord(i), cell))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<C: Cell> Grid<C> {
    /// Draw the grid as one row per line, top row first
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in 0..self.height {
            if y > 0 {
                out.push('\n');
            }
            for x in 0..self.width {
                out.push(self.cells[(y * self.width + x) as usize].symbol());
            }
        }
        out
    }
}

fn neighbor_lists(width: i32, height: i32) -> Vec<Vec<usize>> {
    let mut lists = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let mut indices = Vec::new();
            for nx in (x - 1).max(0)..(x + 2).min(width) {
                for ny in (y - 1).max(0)..(y + 2).min(height) {
                    if nx == x && ny == y {
                        continue;
                    }
                    indices.push((ny * width + nx) as usize);
                }
            }
            lists.push(indices);
        }
    }
    lists
}
