//! Hit listeners and the level counters they update

use super::collision::CollisionSpace;
use super::stepper::{BallId, HitEvent};

/// Handle of a listener in a [`ListenerRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub usize);

/// A plain integer counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter {
    count: i64,
}

impl Counter {
    pub fn new(count: i64) -> Self {
        Self { count }
    }

    pub fn increase(&mut self, amount: i64) {
        self.count += amount;
    }

    pub fn decrease(&mut self, amount: i64) {
        self.count -= amount;
    }

    pub fn value(&self) -> i64 {
        self.count
    }
}

/// Counters owned by a level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelCounters {
    pub remaining_blocks: Counter,
    pub remaining_balls: Counter,
    pub score: Counter,
}

/// What a listener may touch while handling a hit
pub struct HitContext<'a> {
    pub space: &'a mut CollisionSpace,
    pub counters: &'a mut LevelCounters,
    /// Balls to take out of play once the tick's dispatch is done
    pub removed_balls: &'a mut Vec<BallId>,
}

/// Reacts to a block being struck
pub trait HitListener {
    fn hit_event(&mut self, hit: &HitEvent, ctx: &mut HitContext<'_>);
}

/// Removes struck blocks from play
#[derive(Debug, Default)]
pub struct BlockRemover;

impl HitListener for BlockRemover {
    fn hit_event(&mut self, hit: &HitEvent, ctx: &mut HitContext<'_>) {
        if ctx.space.remove(hit.block).is_some() {
            ctx.counters.remaining_blocks.decrease(1);
            log::debug!("removed block {:?}", hit.block);
        }
    }
}

/// Takes balls out of play when they hit the block it's attached to
#[derive(Debug, Default)]
pub struct BallRemover;

impl HitListener for BallRemover {
    fn hit_event(&mut self, hit: &HitEvent, ctx: &mut HitContext<'_>) {
        if !ctx.removed_balls.contains(&hit.ball) {
            ctx.removed_balls.push(hit.ball);
            ctx.counters.remaining_balls.decrease(1);
            log::debug!("ball {:?} lost", hit.ball);
        }
    }
}

/// Adds a fixed number of points per hit
#[derive(Debug)]
pub struct ScoreTracker {
    points: i64,
}

impl ScoreTracker {
    pub fn new(points: i64) -> Self {
        Self { points }
    }
}

impl HitListener for ScoreTracker {
    fn hit_event(&mut self, _hit: &HitEvent, ctx: &mut HitContext<'_>) {
        ctx.counters.score.increase(self.points);
    }
}

/// Owns a level's listeners; blocks refer to them by [`ListenerId`]
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<Box<dyn HitListener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, listener: Box<dyn HitListener>) -> ListenerId {
        self.listeners.push(listener);
        ListenerId(self.listeners.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver hits in order
    ///
    /// Each block's listener list is copied before its listeners run, so a
    /// listener that removes the block doesn't cut off the ones after it.
    /// Hits on blocks that are already gone are dropped.
    pub fn dispatch(&mut self, events: &[HitEvent], ctx: &mut HitContext<'_>) {
        for event in events {
            let Some(block) = ctx.space.block(event.block) else {
                log::debug!("dropping hit on removed block {:?}", event.block);
                continue;
            };
            let snapshot = block.hit_listeners().to_vec();
            for id in snapshot {
                if let Some(listener) = self.listeners.get_mut(id.0) {
                    listener.hit_event(event, ctx);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::Rgb;
    use crate::sim::body::{Block, Body};
    use crate::sim::collision::BodyId;
    use crate::sim::geometry::Rect;

    /// Detaches every listener of the block it's handling
    struct Detacher(Vec<ListenerId>);

    impl HitListener for Detacher {
        fn hit_event(&mut self, hit: &HitEvent, ctx: &mut HitContext<'_>) {
            if let Some(block) = ctx.space.block_mut(hit.block) {
                for &id in &self.0 {
                    block.remove_hit_listener(id);
                }
            }
        }
    }

    fn setup() -> (CollisionSpace, BodyId) {
        let mut space = CollisionSpace::new();
        let id = space.add(Body::Block(Block::new(Rect::from_coords(0.0, 0.0, 10.0, 10.0), Rgb::RED)));
        (space, id)
    }

    #[test]
    fn test_counter() {
        let mut c = Counter::new(3);
        c.increase(5);
        c.decrease(2);
        assert_eq!(c.value(), 6);
    }

    #[test]
    fn test_block_remover_then_score() {
        let (mut space, block) = setup();
        let mut registry = ListenerRegistry::new();
        let remover = registry.register(Box::new(BlockRemover));
        let score = registry.register(Box::new(ScoreTracker::new(5)));
        let b = space.block_mut(block).unwrap();
        b.add_hit_listener(remover);
        b.add_hit_listener(score);

        let mut counters = LevelCounters {
            remaining_blocks: Counter::new(1),
            ..Default::default()
        };
        let mut removed = Vec::new();
        let event = HitEvent { block, ball: BallId(0) };
        let mut ctx = HitContext {
            space: &mut space,
            counters: &mut counters,
            removed_balls: &mut removed,
        };
        // Second event for the same block is dropped
        registry.dispatch(&[event, event], &mut ctx);

        assert!(!space.contains(block));
        assert_eq!(counters.remaining_blocks.value(), 0);
        // Score still counted though the remover ran first
        assert_eq!(counters.score.value(), 5);
    }

    #[test]
    fn test_snapshot_survives_detaching_listener() {
        let (mut space, block) = setup();
        let mut registry = ListenerRegistry::new();
        let score = registry.register(Box::new(ScoreTracker::new(1)));
        let detacher = registry.register(Box::new(Detacher(vec![score])));
        let b = space.block_mut(block).unwrap();
        b.add_hit_listener(detacher);
        b.add_hit_listener(score);

        let mut counters = LevelCounters::default();
        let mut removed = Vec::new();
        let event = HitEvent { block, ball: BallId(0) };
        let mut ctx = HitContext {
            space: &mut space,
            counters: &mut counters,
            removed_balls: &mut removed,
        };
        registry.dispatch(&[event], &mut ctx);
        registry.dispatch(&[event], &mut ctx);

        // First dispatch still reached the score tracker; second didn't
        assert_eq!(counters.score.value(), 1);
    }

    #[test]
    fn test_ball_remover_counts_each_ball_once() {
        let (mut space, block) = setup();
        let mut registry = ListenerRegistry::new();
        let remover = registry.register(Box::new(BallRemover));
        space.block_mut(block).unwrap().add_hit_listener(remover);

        let mut counters = LevelCounters {
            remaining_balls: Counter::new(2),
            ..Default::default()
        };
        let mut removed = Vec::new();
        let mut ctx = HitContext {
            space: &mut space,
            counters: &mut counters,
            removed_balls: &mut removed,
        };
        let hit = HitEvent { block, ball: BallId(7) };
        registry.dispatch(&[hit, hit], &mut ctx);

        assert_eq!(removed, vec![BallId(7)]);
        assert_eq!(counters.remaining_balls.value(), 1);
        // The deathzone itself stays
        assert!(space.contains(block));
    }
}
