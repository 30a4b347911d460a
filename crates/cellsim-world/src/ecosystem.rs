//! Predator-prey ecosystem on a bounded grid.
//!
//! Each tick runs in two phases over the whole grid. The decide phase ages
//! every creature and applies deaths, births, and hunts; it may claim an
//! empty neighbor cell for a newborn but never relocates anyone. The resolve
//! phase then clears dead creatures and wanders the survivors that have not
//! acted into a random empty neighboring cell.

use crate::grid::{Cell, Grid};
use cellsim_core::{Coord, EcosystemConfig, Error, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

/// Ticks a newborn predator survives without eating
const PREDATOR_LIFESPAN: i32 = 7;
/// Ticks between predator breeding attempts
const PREDATOR_BIRTH_INTERVAL: i32 = 9;
/// Ticks between prey breeding events, also a newborn prey's starting age
const PREY_BREEDING_INTERVAL: i32 = 5;
/// Ticks of life a predator gains from a kill
const PREY_FOOD_VALUE: i32 = 5;

pub const PREDATOR_SYMBOL: char = '@';
pub const PREY_SYMBOL: char = '%';
pub const EMPTY_SYMBOL: char = '.';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatureKind {
    Predator,
    Prey,
}

/// One creature: its kind, remaining lifetime, and per-tick bookkeeping flags
#[derive(Debug, Clone, Copy)]
pub struct Creature {
    pub kind: CreatureKind,
    /// Remaining ticks of life; predators refill it by eating, prey use it
    /// as their breeding clock
    pub age: i32,
    /// Predator only: ticks until the next breeding attempt
    pub birth_countdown: i32,
    pub alive: bool,
    /// Set once the creature has acted this tick; resolve skips movers
    pub moved: bool,
}

impl Creature {
    pub fn predator() -> Self {
        Self {
            kind: CreatureKind::Predator,
            age: PREDATOR_LIFESPAN,
            birth_countdown: PREDATOR_BIRTH_INTERVAL,
            alive: true,
            moved: false,
        }
    }

    pub fn prey() -> Self {
        Self {
            kind: CreatureKind::Prey,
            age: PREY_BREEDING_INTERVAL,
            birth_countdown: 0,
            alive: true,
            moved: false,
        }
    }
}

/// A grid cell holding at most one creature
#[derive(Debug, Clone, Copy, Default)]
pub struct CreatureCell {
    occupant: Option<Creature>,
}

impl CreatureCell {
    pub fn occupant(&self) -> Option<&Creature> {
        self.occupant.as_ref()
    }

    pub fn occupant_mut(&mut self) -> Option<&mut Creature> {
        self.occupant.as_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    /// Place a creature if the cell is empty, handing it back otherwise
    pub fn try_insert(&mut self, creature: Creature) -> std::result::Result<(), Creature> {
        if self.occupant.is_some() {
            return Err(creature);
        }
        self.occupant = Some(creature);
        Ok(())
    }

    pub fn take_occupant(&mut self) -> Option<Creature> {
        self.occupant.take()
    }
}

impl Cell for CreatureCell {
    fn symbol(&self) -> char {
        match &self.occupant {
            Some(creature) => match creature.kind {
                CreatureKind::Predator => PREDATOR_SYMBOL,
                CreatureKind::Prey => PREY_SYMBOL,
            },
            None => EMPTY_SYMBOL,
        }
    }
}

/// Live occupant counts by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Census {
    pub predators: usize,
    pub prey: usize,
}

/// Counters accumulated over the whole run
#[derive(Debug, Clone, Copy, Default)]
pub struct EcosystemStats {
    pub ticks: u64,
    pub births: u64,
    pub deaths: u64,
    pub kills: u64,
}

/// The predator-prey simulation
pub struct Ecosystem {
    grid: Grid<CreatureCell>,
    rng: ChaCha8Rng,
    stats: EcosystemStats,
}

impl Ecosystem {
    pub fn new(width: i32, height: i32, rng_seed: u64) -> Result<Self> {
        Ok(Self {
            grid: Grid::new(width, height)?,
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
            stats: EcosystemStats::default(),
        })
    }

    pub fn from_config(config: &EcosystemConfig) -> Result<Self> {
        let mut sim = Self::new(config.grid.width, config.grid.height, config.rng_seed)?;
        for &coord in &config.predators {
            sim.place(coord, Creature::predator())?;
        }
        for &coord in &config.prey {
            sim.place(coord, Creature::prey())?;
        }
        Ok(sim)
    }

    /// Put a creature on the grid before the first tick
    pub fn place(&mut self, coord: Coord, creature: Creature) -> Result<()> {
        let cell = self.grid.get_mut(coord)?;
        cell.try_insert(creature).map_err(|_| Error::OccupancyViolation {
            x: coord.x,
            y: coord.y,
        })
    }

    /// Run the rule pass: age, starve, breed, and hunt, without moving anyone
    pub fn decide(&mut self) {
        let stats = &mut self.stats;
        self.grid
            .for_each_cell(|grid, index| decide_cell(grid, index, stats));
    }

    /// Run the movement pass: drop the dead and wander idle survivors
    pub fn resolve(&mut self) {
        let rng = &mut self.rng;
        self.grid
            .for_each_cell(|grid, index| resolve_cell(grid, index, rng));
        self.stats.ticks += 1;

        let census = self.census();
        debug!(
            tick = self.stats.ticks,
            predators = census.predators,
            prey = census.prey,
            "ecosystem tick resolved"
        );
    }

    /// Advance one full tick
    pub fn tick(&mut self) {
        self.decide();
        self.resolve();
    }

    /// Count live occupants by kind
    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for (_, cell) in self.grid.iter() {
            match cell.occupant() {
                Some(c) if c.alive && c.kind == CreatureKind::Predator => census.predators += 1,
                Some(c) if c.alive => census.prey += 1,
                _ => {}
            }
        }
        census
    }

    pub fn stats(&self) -> &EcosystemStats {
        &self.stats
    }

    pub fn ticks(&self) -> u64 {
        self.stats.ticks
    }

    pub fn render(&self) -> String {
        self.grid.render()
    }
}

fn decide_cell(grid: &mut Grid<CreatureCell>, index: usize, stats: &mut EcosystemStats) {
    let kind = match grid.cell_mut(index).occupant_mut() {
        Some(creature) if creature.alive => {
            creature.age -= 1;
            creature.moved = false;
            creature.kind
        }
        _ => return,
    };

    match kind {
        CreatureKind::Predator => decide_predator(grid, index, stats),
        CreatureKind::Prey => decide_prey(grid, index, stats),
    }
}

/// Predators check for starvation first, then prefer breeding over hunting
/// over idling. A breeding attempt that finds no empty neighbor falls
/// through to the hunt, but the countdown resets either way.
fn decide_predator(grid: &mut Grid<CreatureCell>, index: usize, stats: &mut EcosystemStats) {
    let coord = grid.index_to_coord(index);

    let breeding = {
        let creature = match grid.cell_mut(index).occupant_mut() {
            Some(creature) => creature,
            None => return,
        };
        if creature.age <= 0 {
            creature.alive = false;
            stats.deaths += 1;
            trace!(cell = %coord, "predator starved");
            return;
        }
        creature.birth_countdown -= 1;
        if creature.birth_countdown <= 0 {
            creature.birth_countdown = PREDATOR_BIRTH_INTERVAL;
            true
        } else {
            false
        }
    };

    if breeding && place_near(grid, index, Creature::predator()) {
        stats.births += 1;
        trace!(cell = %coord, kind = "predator", "creature born");
        if let Some(creature) = grid.cell_mut(index).occupant_mut() {
            creature.moved = true;
        }
        return;
    }

    let prey_index = grid.neighbor_indices(index).iter().copied().find(|&n| {
        matches!(
            grid.cell(n).occupant(),
            Some(c) if c.alive && c.kind == CreatureKind::Prey
        )
    });

    if let Some(prey_index) = prey_index {
        if let Some(prey) = grid.cell_mut(prey_index).occupant_mut() {
            prey.alive = false;
        }
        stats.kills += 1;
        stats.deaths += 1;
        trace!(cell = %coord, prey = %grid.index_to_coord(prey_index), "predator ate prey");
        if let Some(creature) = grid.cell_mut(index).occupant_mut() {
            creature.age += PREY_FOOD_VALUE;
            creature.moved = true;
        }
    }
}

/// Prey never starve; an expired age is the signal to breed and restarts the
/// clock whether or not a free cell was found for the newborn.
fn decide_prey(grid: &mut Grid<CreatureCell>, index: usize, stats: &mut EcosystemStats) {
    let coord = grid.index_to_coord(index);

    let breeding = {
        let creature = match grid.cell_mut(index).occupant_mut() {
            Some(creature) => creature,
            None => return,
        };
        if creature.age <= 0 {
            creature.age = PREY_BREEDING_INTERVAL;
            true
        } else {
            false
        }
    };

    if breeding && place_near(grid, index, Creature::prey()) {
        stats.births += 1;
        trace!(cell = %coord, kind = "prey", "creature born");
        if let Some(creature) = grid.cell_mut(index).occupant_mut() {
            creature.moved = true;
        }
    }
}

/// Claim the first empty neighbor in fixed scan order for `creature`
fn place_near(grid: &mut Grid<CreatureCell>, index: usize, creature: Creature) -> bool {
    let neighbors = grid.neighbor_indices(index).to_vec();
    for neighbor in neighbors {
        if grid.cell_mut(neighbor).try_insert(creature).is_ok() {
            return true;
        }
    }
    false
}

fn resolve_cell(grid: &mut Grid<CreatureCell>, index: usize, rng: &mut ChaCha8Rng) {
    let creature = match grid.cell(index).occupant() {
        Some(creature) => *creature,
        None => return,
    };

    if !creature.alive {
        grid.cell_mut(index).take_occupant();
        return;
    }

    if creature.moved {
        return;
    }

    let empty_neighbors: Vec<usize> = grid
        .neighbor_indices(index)
        .iter()
        .copied()
        .filter(|&n| grid.cell(n).is_empty())
        .collect();

    // Wander into a random empty neighbor; the moved flag is set either way
    // so a creature visited again at its new index stays put.
    let mut home = index;
    if let Some(&dest) = empty_neighbors.choose(rng) {
        trace!(
            from = %grid.index_to_coord(index),
            to = %grid.index_to_coord(dest),
            "creature wandered"
        );
        let occupant = grid.cell_mut(index).take_occupant();
        grid.cell_mut(dest).occupant = occupant;
        home = dest;
    }
    if let Some(occupant) = grid.cell_mut(home).occupant_mut() {
        occupant.moved = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_creature_constructors() {
        let predator = Creature::predator();
        assert_eq!(predator.kind, CreatureKind::Predator);
        assert_eq!(predator.age, 7);
        assert_eq!(predator.birth_countdown, 9);
        assert!(predator.alive);
        assert!(!predator.moved);

        let prey = Creature::prey();
        assert_eq!(prey.kind, CreatureKind::Prey);
        assert_eq!(prey.age, 5);
        assert!(prey.alive);
    }

    #[test]
    fn test_place_rejects_double_occupancy() {
        let mut sim = Ecosystem::new(5, 5, 0).unwrap();
        sim.place(Coord::new(2, 2), Creature::predator()).unwrap();
        let result = sim.place(Coord::new(2, 2), Creature::prey());
        assert!(matches!(result, Err(Error::OccupancyViolation { .. })));
    }

    #[test]
    fn test_place_out_of_bounds() {
        let mut sim = Ecosystem::new(5, 5, 0).unwrap();
        let result = sim.place(Coord::new(5, 5), Creature::prey());
        assert!(matches!(result, Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn test_render_symbols() {
        let mut sim = Ecosystem::new(3, 1, 0).unwrap();
        sim.place(Coord::new(0, 0), Creature::predator()).unwrap();
        sim.place(Coord::new(1, 0), Creature::prey()).unwrap();
        assert_eq!(sim.render(), "@%.");
    }

    #[test]
    fn test_lone_predator_starves_after_seven_ticks() {
        let mut sim = Ecosystem::new(5, 5, 42).unwrap();
        sim.place(Coord::new(2, 2), Creature::predator()).unwrap();

        for _ in 0..6 {
            sim.tick();
            assert_eq!(sim.census().predators, 1);
        }

        sim.tick();
        assert_eq!(sim.census(), Census::default());
        assert_eq!(sim.stats().deaths, 1);
        assert_eq!(sim.stats().kills, 0);
    }

    #[test]
    fn test_predator_eats_adjacent_prey() {
        let mut sim = Ecosystem::new(5, 5, 0).unwrap();
        sim.place(Coord::new(0, 0), Creature::predator()).unwrap();
        sim.place(Coord::new(0, 1), Creature::prey()).unwrap();

        sim.tick();

        assert_eq!(sim.census(), Census { predators: 1, prey: 0 });
        assert_eq!(sim.stats().kills, 1);
        assert_eq!(sim.stats().deaths, 1);

        // The hunter counts as having acted, so it stays put and keeps the
        // feeding bonus on top of its aged-down lifetime
        let hunter = sim.grid.get(Coord::new(0, 0)).unwrap().occupant().unwrap();
        assert_eq!(hunter.age, 11);
    }

    #[test]
    fn test_predator_breeds_when_countdown_expires() {
        let mut sim = Ecosystem::new(3, 3, 7).unwrap();
        let mut parent = Creature::predator();
        parent.age = 20;
        parent.birth_countdown = 1;
        sim.place(Coord::new(1, 1), parent).unwrap();

        sim.tick();

        assert_eq!(sim.census().predators, 2);
        assert_eq!(sim.stats().births, 1);

        let parent = sim.grid.get(Coord::new(1, 1)).unwrap().occupant().unwrap();
        assert_eq!(parent.age, 19);
        assert_eq!(parent.birth_countdown, 9);
    }

    #[test]
    fn test_failed_breeding_falls_back_to_hunt() {
        let mut sim = Ecosystem::new(3, 3, 0).unwrap();
        let mut parent = Creature::predator();
        parent.age = 20;
        parent.birth_countdown = 1;
        sim.place(Coord::new(1, 1), parent).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                if x != 1 || y != 1 {
                    sim.place(Coord::new(x, y), Creature::prey()).unwrap();
                }
            }
        }

        sim.tick();

        assert_eq!(sim.stats().births, 0);
        assert_eq!(sim.stats().kills, 1);
        assert_eq!(sim.census(), Census { predators: 1, prey: 7 });

        // Countdown restarted even though no room was found for the newborn
        let parent = sim.grid.get(Coord::new(1, 1)).unwrap().occupant().unwrap();
        assert_eq!(parent.birth_countdown, 9);
    }

    #[test]
    fn test_prey_breeds_every_five_ticks() {
        let mut sim = Ecosystem::new(5, 5, 3).unwrap();
        sim.place(Coord::new(2, 2), Creature::prey()).unwrap();

        for _ in 0..5 {
            sim.tick();
        }
        assert_eq!(sim.census().prey, 2);
        assert_eq!(sim.stats().births, 1);

        for _ in 0..5 {
            sim.tick();
        }
        assert_eq!(sim.census().prey, 4);
    }

    #[test]
    fn test_fixed_seed_reproduces_run() {
        let config = EcosystemConfig::default();
        let mut a = Ecosystem::from_config(&config).unwrap();
        let mut b = Ecosystem::from_config(&config).unwrap();

        for _ in 0..20 {
            a.tick();
            b.tick();
            assert_eq!(a.render(), b.render());
        }
        assert_eq!(a.census(), b.census());
    }

    #[test]
    fn test_stats_reconcile_with_census() {
        let config = EcosystemConfig::default();
        let placed = (config.predators.len() + config.prey.len()) as i64;
        let mut sim = Ecosystem::from_config(&config).unwrap();

        for _ in 0..12 {
            sim.tick();
            let census = sim.census();
            let stats = sim.stats();
            let live = (census.predators + census.prey) as i64;
            assert_eq!(live, placed + stats.births as i64 - stats.deaths as i64);
            assert!(stats.kills <= stats.deaths);
        }
        assert_eq!(sim.ticks(), 12);
    }

    proptest! {
        #[test]
        fn prop_tick_invariants(seed in any::<u64>(), width in 4i32..=10, height in 4i32..=10) {
            let mut sim = Ecosystem::new(width, height, seed).unwrap();
            sim.place(Coord::new(0, 0), Creature::predator()).unwrap();
            sim.place(Coord::new(3, 2), Creature::predator()).unwrap();
            sim.place(Coord::new(0, 1), Creature::prey()).unwrap();
            sim.place(Coord::new(2, 3), Creature::prey()).unwrap();
            sim.place(Coord::new(3, 0), Creature::prey()).unwrap();
            let placed = 5i64;

            for _ in 0..15 {
                sim.tick();

                let census = sim.census();
                let stats = *sim.stats();
                let live = (census.predators + census.prey) as i64;
                prop_assert_eq!(live, placed + stats.births as i64 - stats.deaths as i64);

                let render = sim.render();
                prop_assert_eq!(
                    render.chars().filter(|&c| c == '@').count(),
                    census.predators
                );
                prop_assert_eq!(
                    render.chars().filter(|&c| c == '%').count(),
                    census.prey
                );

                for (_, cell) in sim.grid.iter() {
                    if let Some(creature) = cell.occupant() {
                        prop_assert!(creature.alive);
                        prop_assert!(creature.moved);
                        match creature.kind {
                            CreatureKind::Prey => {
                                prop_assert!((1..=5).contains(&creature.age));
                            }
                            CreatureKind::Predator => {
                                prop_assert!(creature.age >= 1);
                            }
                        }
                    }
                }
            }
        }
    }
}
