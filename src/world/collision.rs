//! Contact reactions
//!
//! The engine reports contacts two ways: a queued `CollisionEvent` that the
//! session drains each tick, and an immediate per-entity callback. The
//! callback side is `dispatch_contact`, which asks each participant how it
//! reacts to the other and applies the result.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityKind};

/// Two entities touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub a: EntityId,
    pub b: EntityId,
}

impl CollisionEvent {
    pub fn new(a: EntityId, b: EntityId) -> Self {
        Self { a, b }
    }

    /// The other participant, if `id` took part
    pub fn other(&self, id: EntityId) -> Option<EntityId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}

/// What a contact does to the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Every good block goes back to untouched
    ResetAllGoodBlocks,
    ResetGoodBlock(EntityId),
    MarkAddedBlocks(EntityId),
    SlayQueen(EntityId),
}

/// How `subject` reacts to touching `other`
pub fn reaction(subject: &Entity, other: &Entity, all_good_blocks_touched: bool) -> Option<Reaction> {
    match (&subject.kind, &other.kind) {
        (EntityKind::EvilBlock(_), EntityKind::Ball) => Some(Reaction::ResetAllGoodBlocks),
        (EntityKind::Worm(_), EntityKind::GoodBlock(_)) => Some(Reaction::ResetGoodBlock(other.id)),
        (EntityKind::Queen(_), EntityKind::GoodBlock(block)) if block.touched => {
            Some(Reaction::ResetGoodBlock(other.id))
        }
        (EntityKind::Queen(queen), EntityKind::EvilBlock(_)) if !queen.added_blocks => {
            Some(Reaction::MarkAddedBlocks(subject.id))
        }
        (EntityKind::Queen(queen), EntityKind::Ball) if queen.alive && all_good_blocks_touched => {
            Some(Reaction::SlayQueen(subject.id))
        }
        _ => None,
    }
}

/// A ball contact with `block` is waiting in the queue
fn touch_queued(entities: &[Entity], queued: &[CollisionEvent], block: EntityId) -> bool {
    queued
        .iter()
        .filter_map(|event| event.other(block))
        .any(|other| entities.iter().any(|e| e.id == other && e.is_ball()))
}

/// Every good block is touched, counting ball contacts still queued for
/// `touch_good_blocks`
fn all_good_blocks_touched(entities: &[Entity], queued: &[CollisionEvent]) -> bool {
    entities.iter().all(|e| match e.good_block() {
        Some(block) => block.touched || touch_queued(entities, queued, e.id),
        None => true,
    })
}

/// Apply one reaction
pub fn apply(entities: &mut [Entity], reaction: Reaction) {
    match reaction {
        Reaction::ResetAllGoodBlocks => {
            let reset = entities
                .iter_mut()
                .map(|e| e.set_touched(false))
                .filter(|&flipped| flipped)
                .count();
            if reset > 0 {
                log::debug!("Evil block reset {} good blocks", reset);
            }
        }
        Reaction::ResetGoodBlock(id) => {
            if let Some(e) = entities.iter_mut().find(|e| e.id == id) {
                e.set_touched(false);
            }
        }
        Reaction::MarkAddedBlocks(id) => {
            if let Some(q) = entities.iter_mut().find(|e| e.id == id).and_then(Entity::queen_mut) {
                q.added_blocks = true;
            }
        }
        Reaction::SlayQueen(id) => {
            if let Some(q) = entities.iter_mut().find(|e| e.id == id).and_then(Entity::queen_mut) {
                q.alive = false;
                log::info!("The queen has fallen");
            }
        }
    }
}

/// Run both participants' contact callbacks. `queued` holds contacts not yet
/// drained this tick. Returns the reactions applied.
pub fn dispatch_contact(
    entities: &mut [Entity],
    event: CollisionEvent,
    queued: &[CollisionEvent],
) -> Vec<Reaction> {
    let find = |id: EntityId| entities.iter().position(|e| e.id == id);
    let (Some(ia), Some(ib)) = (find(event.a), find(event.b)) else {
        return Vec::new();
    };

    let mut reactions = Vec::new();
    for (subject, other) in [(ia, ib), (ib, ia)] {
        // Re-evaluated per callback; the first may have changed the world
        let all_touched = all_good_blocks_touched(entities, queued);
        if let Some(r) = reaction(&entities[subject], &entities[other], all_touched) {
            apply(entities, r);
            reactions.push(r);
        }
    }
    reactions
}

/// Mark good blocks the ball touched. Returns how many newly flipped.
pub fn touch_good_blocks(entities: &mut [Entity], events: &[CollisionEvent]) -> usize {
    let mut touched = 0;
    for event in events {
        let kind_of = |id: EntityId| entities.iter().position(|e| e.id == id);
        let (Some(ia), Some(ib)) = (kind_of(event.a), kind_of(event.b)) else {
            continue;
        };
        let block = match (entities[ia].is_ball(), entities[ib].is_ball()) {
            (true, false) => ib,
            (false, true) => ia,
            _ => continue,
        };
        if entities[block].set_touched(true) {
            touched += 1;
        }
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::entity::{EvilBlock, GoodBlock, Queen, Worm};
    use glam::Vec2;

    fn world() -> Vec<Entity> {
        let kinds = vec![
            EntityKind::Ball,
            EntityKind::GoodBlock(GoodBlock { shape: Vec::new(), touched: true }),
            EntityKind::GoodBlock(GoodBlock { shape: Vec::new(), touched: true }),
            EntityKind::EvilBlock(EvilBlock { shape: Vec::new() }),
            EntityKind::Worm(Worm::default()),
            EntityKind::Queen(Queen::default()),
        ];
        kinds
            .into_iter()
            .enumerate()
            .map(|(i, k)| {
                let mut e = Entity::new(k, Vec2::ZERO);
                e.id = EntityId(i as u32 + 1);
                e
            })
            .collect()
    }

    fn touched(entities: &[Entity]) -> Vec<bool> {
        entities.iter().filter_map(Entity::good_block).map(|b| b.touched).collect()
    }

    #[test]
    fn test_evil_block_resets_all() {
        let mut w = world();
        let r = dispatch_contact(&mut w, CollisionEvent::new(EntityId(1), EntityId(4)), &[]);
        assert_eq!(r, vec![Reaction::ResetAllGoodBlocks]);
        assert_eq!(touched(&w), vec![false, false]);
    }

    #[test]
    fn test_worm_resets_one() {
        let mut w = world();
        dispatch_contact(&mut w, CollisionEvent::new(EntityId(3), EntityId(5)), &[]);
        assert_eq!(touched(&w), vec![true, false]);
    }

    #[test]
    fn test_queen_reactions() {
        let mut w = world();
        dispatch_contact(&mut w, CollisionEvent::new(EntityId(6), EntityId(2)), &[]);
        assert_eq!(touched(&w), vec![false, true]);

        dispatch_contact(&mut w, CollisionEvent::new(EntityId(6), EntityId(4)), &[]);
        assert!(w[5].queen().unwrap().added_blocks);
        // Evil block only reacts to the ball
        assert_eq!(touched(&w), vec![false, true]);
    }

    #[test]
    fn test_ball_slays_queen_only_when_blocks_done() {
        let mut w = world();
        w[1].set_touched(false);
        dispatch_contact(&mut w, CollisionEvent::new(EntityId(1), EntityId(6)), &[]);
        assert!(w[5].queen().unwrap().alive);

        w[1].set_touched(true);
        dispatch_contact(&mut w, CollisionEvent::new(EntityId(6), EntityId(1)), &[]);
        assert!(!w[5].queen().unwrap().alive);
    }

    #[test]
    fn test_touch_good_blocks_from_queue() {
        let mut w = world();
        w[1].set_touched(false);
        w[2].set_touched(false);
        let events = [
            CollisionEvent::new(EntityId(2), EntityId(1)),
            CollisionEvent::new(EntityId(1), EntityId(2)),
            // Worm on block is not a touch
            CollisionEvent::new(EntityId(5), EntityId(3)),
            CollisionEvent::new(EntityId(1), EntityId(99)),
        ];
        assert_eq!(touch_good_blocks(&mut w, &events), 1);
        assert_eq!(touched(&w), vec![true, false]);
    }

    #[test]
    fn test_queued_touches_count_for_queen() {
        let mut w = world();
        w[1].set_touched(false);
        w[2].set_touched(false);
        let queued = [
            CollisionEvent::new(EntityId(1), EntityId(2)),
            CollisionEvent::new(EntityId(3), EntityId(1)),
        ];
        // Only one block queued: the queen holds
        dispatch_contact(&mut w, CollisionEvent::new(EntityId(1), EntityId(6)), &queued[..1]);
        assert!(w[5].queen().unwrap().alive);

        let r = dispatch_contact(&mut w, CollisionEvent::new(EntityId(1), EntityId(6)), &queued);
        assert_eq!(r, vec![Reaction::SlayQueen(EntityId(6))]);
        assert!(!w[5].queen().unwrap().alive);
    }

    #[test]
    fn test_worm_contacts_do_not_count_as_queued_touches() {
        let mut w = world();
        w[1].set_touched(false);
        let queued = [CollisionEvent::new(EntityId(5), EntityId(2))];
        dispatch_contact(&mut w, CollisionEvent::new(EntityId(6), EntityId(1)), &queued);
        assert!(w[5].queen().unwrap().alive);
    }
}
