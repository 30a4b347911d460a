//! Game-of-life rules on a bounded grid.

use crate::grid::{Cell, Grid};
use cellsim_core::{Coord, LifeConfig, Result};
use tracing::debug;

const ALIVE_SYMBOL: char = 'O';
const DEAD_SYMBOL: char = '.';

/// One life cell: the committed state plus the state staged for the next tick
#[derive(Debug, Clone, Copy, Default)]
pub struct LifeCell {
    pub alive: bool,
    pub next_alive: bool,
}

impl Cell for LifeCell {
    fn symbol(&self) -> char {
        if self.alive {
            ALIVE_SYMBOL
        } else {
            DEAD_SYMBOL
        }
    }
}

/// The game-of-life simulation
pub struct Life {
    grid: Grid<LifeCell>,
    generation: u64,
}

impl Life {
    pub fn new(width: i32, height: i32) -> Result<Self> {
        Ok(Self {
            grid: Grid::new(width, height)?,
            generation: 0,
        })
    }

    pub fn from_config(config: &LifeConfig) -> Result<Self> {
        let mut sim = Self::new(config.grid.width, config.grid.height)?;
        for &coord in &config.seeds {
            sim.seed(coord)?;
        }
        Ok(sim)
    }

    /// Mark a cell alive before the first tick
    pub fn seed(&mut self, coord: Coord) -> Result<()> {
        let cell = self.grid.get_mut(coord)?;
        cell.alive = true;
        cell.next_alive = true;
        Ok(())
    }

    /// Stage every cell's next state from its live neighbor count.
    ///
    /// Committed states are never touched here, so every cell reads a
    /// consistent snapshot of the current generation.
    pub fn decide(&mut self) {
        self.grid.for_each_cell(|grid, index| {
            let live_neighbors = grid
                .neighbor_indices(index)
                .iter()
                .filter(|&&n| grid.cell(n).alive)
                .count();
            let cell = grid.cell_mut(index);
            cell.next_alive = evaluate(cell.alive, live_neighbors);
        });
    }

    /// Apply the staged states, producing the next generation
    pub fn commit(&mut self) {
        self.grid.for_each_cell(|grid, index| {
            let cell = grid.cell_mut(index);
            cell.alive = cell.next_alive;
        });
        self.generation += 1;
        debug!(
            generation = self.generation,
            population = self.population(),
            "life generation committed"
        );
    }

    /// Advance one full generation
    pub fn tick(&mut self) {
        self.decide();
        self.commit();
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.grid.iter().filter(|(_, cell)| cell.alive).count()
    }

    pub fn is_alive(&self, coord: Coord) -> Result<bool> {
        Ok(self.grid.get(coord)?.alive)
    }

    pub fn render(&self) -> String {
        self.grid.render()
    }
}

/// Classic birth/survival rule. A live cell keeps living with 2 or 3 live
/// neighbors, a dead cell with exactly 3 comes alive, everything else
/// carries its current state forward.
fn evaluate(alive: bool, live_neighbors: usize) -> bool {
    match (alive, live_neighbors) {
        (true, n) if n < 2 || n > 3 => false,
        (false, 3) => true,
        (current, _) => current,
    }
}
