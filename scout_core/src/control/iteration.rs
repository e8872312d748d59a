// scout_core/src/control/iteration.rs

//! Per-frame memoisation for the steering controller.
//!
//! Every stored value is stamped with the iteration it was computed in. A new
//! raw map bumps the counter, which invalidates everything at once; lookups
//! compare stamps instead of clearing fields one by one.

use crate::types::{Cell, ObjectPosition, VelocityCommand};

#[derive(Debug, Clone)]
struct Stamped<K, V> {
    iteration: u64,
    key: K,
    value: V,
}

/// Work done at most once per iteration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Once {
    RegionCarved,
    CollisionsDrawn,
    DirectionDrawn,
}

impl Once {
    const COUNT: usize = 3;

    fn index(self) -> usize {
        match self {
            Once::RegionCarved => 0,
            Once::CollisionsDrawn => 1,
            Once::DirectionDrawn => 2,
        }
    }
}

/// The memoised outcome of the direction decision.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DirectionResult {
    pub command: VelocityCommand,
    /// True when the command came from a planned path to the target.
    pub seeking_target: bool,
}

#[derive(Debug, Clone, Default)]
pub struct IterationCache {
    iteration: u64,
    collisions: Option<Stamped<(), Vec<bool>>>,
    direction: Option<Stamped<Option<ObjectPosition>, DirectionResult>>,
    heading: Option<Stamped<Cell, Option<f64>>>,
    signal: Option<Stamped<Option<ObjectPosition>, bool>>,
    done: [Option<u64>; Once::COUNT],
}

impl IterationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Starts a new iteration, invalidating every memoised value.
    pub fn advance(&mut self) -> u64 {
        self.iteration += 1;
        self.iteration
    }

    fn lookup<'a, K: PartialEq, V>(&self, slot: &'a Option<Stamped<K, V>>, key: &K) -> Option<&'a V> {
        slot.as_ref()
            .filter(|s| s.iteration == self.iteration && s.key == *key)
            .map(|s| &s.value)
    }

    pub fn collisions(&self) -> Option<&[bool]> {
        self.lookup(&self.collisions, &()).map(Vec::as_slice)
    }

    pub fn store_collisions(&mut self, value: Vec<bool>) {
        self.collisions = Some(Stamped {
            iteration: self.iteration,
            key: (),
            value,
        });
    }

    pub fn direction(&self, target: &Option<ObjectPosition>) -> Option<DirectionResult> {
        self.lookup(&self.direction, target).copied()
    }

    pub fn store_direction(&mut self, target: Option<ObjectPosition>, value: DirectionResult) {
        self.direction = Some(Stamped {
            iteration: self.iteration,
            key: target,
            value,
        });
    }

    /// Outer `None` means not computed yet; inner `None` means no heading exists.
    pub fn heading(&self, goal: Cell) -> Option<Option<f64>> {
        self.lookup(&self.heading, &goal).copied()
    }

    pub fn store_heading(&mut self, goal: Cell, value: Option<f64>) {
        self.heading = Some(Stamped {
            iteration: self.iteration,
            key: goal,
            value,
        });
    }

    pub fn signal(&self, target: &Option<ObjectPosition>) -> Option<bool> {
        self.lookup(&self.signal, target).copied()
    }

    pub fn store_signal(&mut self, target: Option<ObjectPosition>, value: bool) {
        self.signal = Some(Stamped {
            iteration: self.iteration,
            key: target,
            value,
        });
    }

    pub fn is_done(&self, work: Once) -> bool {
        self.done[work.index()] == Some(self.iteration)
    }

    pub fn mark_done(&mut self, work: Once) {
        self.done[work.index()] = Some(self.iteration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_expire_with_the_iteration() {
        let mut cache = IterationCache::new();
        cache.store_collisions(vec![true, false]);
        cache.mark_done(Once::RegionCarved);
        assert_eq!(cache.collisions(), Some(&[true, false][..]));
        assert!(cache.is_done(Once::RegionCarved));
        assert!(!cache.is_done(Once::DirectionDrawn));

        assert_eq!(cache.advance(), 1);
        assert_eq!(cache.collisions(), None);
        assert!(!cache.is_done(Once::RegionCarved));
    }

    #[test]
    fn keyed_values_only_match_their_key() {
        let mut cache = IterationCache::new();
        let target = Some(ObjectPosition::new(10, 20, 4, 4));
        cache.store_signal(target, true);
        assert_eq!(cache.signal(&target), Some(true));
        assert_eq!(cache.signal(&None), None);

        cache.store_heading(Cell::new(10, 20), None);
        assert_eq!(cache.heading(Cell::new(10, 20)), Some(None));
        assert_eq!(cache.heading(Cell::new(10, 21)), None);
    }
}
