use bevy::prelude::*;

use crate::error::PuzzleError;
use crate::tags::{TagTable, VehicleTag};

/// Fisher-Yates shuffle of `0..len`, swapping each position with a uniformly
/// chosen index at or after it.
pub fn shuffled_indices(len: usize, rng: &mut fastrand::Rng) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    for i in 0..len {
        let j = rng.usize(i..len);
        indices.swap(i, j);
    }
    indices
}

/// One item placed on one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub item: usize,
    pub slot: usize,
}

/// Random one-to-one mapping from items to slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pairing {
    pairs: Vec<Pair>,
}

impl Pairing {
    /// Pairs `items[k]` with `slots[shuffled[k]]` for every `k` both sides can
    /// cover. Extra items or slots stay unpaired.
    pub fn assign<I, S>(items: &[I], slots: &[S], rng: &mut fastrand::Rng) -> Self {
        let shuffled = shuffled_indices(slots.len(), rng);
        let pairs = shuffled
            .into_iter()
            .take(items.len())
            .enumerate()
            .map(|(item, slot)| Pair { item, slot })
            .collect();
        Self { pairs }
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Spawn positions of the vehicles, indexed by roster position.
#[derive(Resource, Debug, Clone, Default)]
pub struct OriginRegistry {
    origins: Vec<Option<Vec2>>,
}

impl OriginRegistry {
    /// Records where every paired item starts. `positions` holds the
    /// candidate anchor positions the pairing refers to.
    pub fn record(&mut self, pairing: &Pairing, item_count: usize, positions: &[Vec2]) {
        self.origins = vec![None; item_count];
        for pair in pairing.pairs() {
            if let (Some(origin), Some(&position)) =
                (self.origins.get_mut(pair.item), positions.get(pair.slot))
            {
                *origin = Some(position);
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<Vec2> {
        self.origins.get(index).copied().flatten()
    }

    /// Where a vehicle with `tag` goes back to after a wrong drop.
    pub fn origin_of(&self, tags: &TagTable, tag: VehicleTag) -> Result<Vec2, PuzzleError> {
        let effects = tags.effects(tag)?;
        self.get(effects.reset_index)
            .ok_or(PuzzleError::LookupMiss(tag))
    }
}
