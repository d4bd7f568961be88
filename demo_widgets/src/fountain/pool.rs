//! Bounded FIFO pool of live emoji bodies with per-kind dense slots.

use std::collections::VecDeque;

use bevy::log::debug;
use rand::Rng;

use super::emoji::EmojiKind;
use super::physics::{BodyHandle, BodyPose, EmojiBodySpec, PhysicsWorld};

pub const DEFAULT_CAPACITY: usize = 500;
pub const DEFAULT_BODY_RADIUS: f32 = 1.25 * 0.38;

const MASS_MIN: f32 = 0.5;
const MASS_MAX: f32 = 1.5;
const JITTER_X: f32 = 0.2;
const JITTER_Y: f32 = 0.1;
const LINEAR_DAMPING: f32 = 0.01;
const ANGULAR_DAMPING: f32 = 0.02;
const BODY_FRICTION: f32 = 0.02;
const BODY_RESTITUTION: f32 = 0.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub kind: EmojiKind,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmojiInstance {
    pub kind: EmojiKind,
    pub body: BodyHandle,
    /// Index into the kind's slot batch.
    pub slot: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Category {
    pub count: usize,
}

/// Categories in first-use order. Entries outlive eviction and clear.
#[derive(Clone, Debug, Default)]
pub struct CategoryRegistry {
    entries: Vec<(EmojiKind, Category)>,
}

impl CategoryRegistry {
    /// Returns the category, creating it with a zero count on first use.
    pub fn register(&mut self, kind: EmojiKind) -> &mut Category {
        let index = match self.entries.iter().position(|(k, _)| *k == kind) {
            Some(index) => index,
            None => {
                self.entries.push((kind, Category::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    pub fn get(&self, kind: EmojiKind) -> Option<&Category> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, category)| category)
    }

    pub fn count(&self, kind: EmojiKind) -> usize {
        self.get(kind).map_or(0, |category| category.count)
    }

    pub fn kinds(&self) -> impl Iterator<Item = EmojiKind> + '_ {
        self.entries.iter().map(|(kind, _)| *kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn zero_counts(&mut self) {
        for (_, category) in &mut self.entries {
            category.count = 0;
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug)]
pub struct EmojiPool {
    instances: VecDeque<EmojiInstance>,
    registry: CategoryRegistry,
    capacity: usize,
    body_radius: f32,
}

impl Default for EmojiPool {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EmojiPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            instances: VecDeque::with_capacity(capacity),
            registry: CategoryRegistry::default(),
            capacity: capacity.max(1),
            body_radius: DEFAULT_BODY_RADIUS,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn instances(&self) -> impl Iterator<Item = &EmojiInstance> {
        self.instances.iter()
    }

    /// Collider radius for bodies created from now on.
    pub fn set_body_radius(&mut self, radius: f32) {
        self.body_radius = radius;
    }

    pub fn body_radius(&self) -> f32 {
        self.body_radius
    }

    /// Make sure a category exists without spawning anything.
    pub fn register(&mut self, kind: EmojiKind) {
        self.registry.register(kind);
    }

    /// Create one body, evicting the oldest first when the pool is full.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        physics: &mut PhysicsWorld,
        request: SpawnRequest,
        rng: &mut R,
    ) -> EmojiInstance {
        if self.instances.len() >= self.capacity {
            self.evict_oldest(physics);
        }

        let [vx, vy] = request.velocity;
        let speed = vx.hypot(vy);
        let spec = EmojiBodySpec {
            position: request.position,
            velocity: [
                vx + (rng.gen::<f32>() - 0.5) * 2.0 * JITTER_X,
                vy + (rng.gen::<f32>() - 0.5) * 2.0 * JITTER_Y,
            ],
            angular_velocity: speed * 0.5 * (rng.gen::<f32>() - 0.5) * 2.0,
            mass: rng.gen_range(MASS_MIN..MASS_MAX),
            radius: self.body_radius,
            friction: BODY_FRICTION,
            restitution: BODY_RESTITUTION,
            linear_damping: LINEAR_DAMPING,
            angular_damping: ANGULAR_DAMPING,
        };
        let body = physics.add_emoji_body(spec);

        let category = self.registry.register(request.kind);
        let instance = EmojiInstance {
            kind: request.kind,
            body,
            slot: category.count,
        };
        category.count += 1;
        self.instances.push_back(instance);
        instance
    }

    /// Remove the oldest body and close the gap it leaves in its kind's
    /// slots. Returns the freed `(kind, slot)`.
    pub fn evict_oldest(&mut self, physics: &mut PhysicsWorld) -> Option<(EmojiKind, usize)> {
        let oldest = self.instances.pop_front()?;
        physics.remove_body(oldest.body);

        for instance in self
            .instances
            .iter_mut()
            .filter(|i| i.kind == oldest.kind && i.slot > oldest.slot)
        {
            instance.slot -= 1;
        }
        let category = self.registry.register(oldest.kind);
        category.count = category.count.saturating_sub(1);

        debug!("evicted {:?} from slot {}", oldest.kind, oldest.slot);
        Some((oldest.kind, oldest.slot))
    }

    /// Remove every body. Categories stay registered with zero counts.
    pub fn clear_all(&mut self, physics: &mut PhysicsWorld) {
        for instance in self.instances.drain(..) {
            physics.remove_body(instance.body);
        }
        self.registry.zero_counts();
    }

    /// Like `clear_all`, but also forgets every category.
    pub fn reset(&mut self, physics: &mut PhysicsWorld) {
        self.clear_all(physics);
        self.registry.clear();
    }

    /// Poses for `kind`, indexed by slot. Bodies missing from the world
    /// report `None`.
    pub fn slot_poses(&self, kind: EmojiKind, physics: &PhysicsWorld) -> Vec<Option<BodyPose>> {
        let mut poses = vec![None; self.registry.count(kind)];
        for instance in self.instances.iter().filter(|i| i.kind == kind) {
            if let Some(pose) = poses.get_mut(instance.slot) {
                *pose = physics.body_pose(instance.body);
            }
        }
        poses
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    fn request(kind: EmojiKind) -> SpawnRequest {
        SpawnRequest {
            position: [0.0, 0.0],
            velocity: [1.0, 2.0],
            kind,
        }
    }

    fn assert_slots_dense(pool: &EmojiPool) {
        for kind in EmojiKind::ALL {
            let mut slots: Vec<_> = pool
                .instances()
                .filter(|i| i.kind == kind)
                .map(|i| i.slot)
                .collect();
            slots.sort_unstable();
            let expected: Vec<_> = (0..pool.registry().count(kind)).collect();
            assert_eq!(slots, expected, "slots for {kind:?}");
        }
    }

    #[test]
    fn spawn_assigns_consecutive_slots_per_kind() {
        let mut physics = PhysicsWorld::new();
        let mut pool = EmojiPool::new(10);
        let mut rng = SmallRng::seed_from_u64(1);

        let a = pool.spawn(&mut physics, request(EmojiKind::Grinning), &mut rng);
        let b = pool.spawn(&mut physics, request(EmojiKind::Dizzy), &mut rng);
        let c = pool.spawn(&mut physics, request(EmojiKind::Grinning), &mut rng);

        assert_eq!((a.slot, b.slot, c.slot), (0, 0, 1));
        assert_eq!(pool.registry().count(EmojiKind::Grinning), 2);
        assert_eq!(pool.registry().count(EmojiKind::Dizzy), 1);
        assert_eq!(physics.dynamic_body_count(), 3);
    }

    #[test]
    fn full_pool_evicts_oldest_first() {
        let mut physics = PhysicsWorld::new();
        let mut pool = EmojiPool::new(3);
        let mut rng = SmallRng::seed_from_u64(2);

        let first = pool.spawn(&mut physics, request(EmojiKind::Grinning), &mut rng);
        pool.spawn(&mut physics, request(EmojiKind::HeartEyes), &mut rng);
        pool.spawn(&mut physics, request(EmojiKind::Grinning), &mut rng);
        pool.spawn(&mut physics, request(EmojiKind::Sunglasses), &mut rng);

        assert_eq!(pool.len(), 3);
        assert!(!physics.contains(first.body));
        assert_eq!(physics.dynamic_body_count(), 3);
        assert_eq!(pool.registry().count(EmojiKind::Grinning), 1);
        assert_eq!(pool.instances().next().unwrap().kind, EmojiKind::HeartEyes);
        assert_slots_dense(&pool);
    }

    #[test]
    fn capacity_and_slot_invariants_hold_for_random_sequences() {
        let mut physics = PhysicsWorld::new();
        let mut pool = EmojiPool::new(40);
        let mut rng = SmallRng::seed_from_u64(7);

        for step in 0..400 {
            let kind = EmojiKind::ALL[rng.gen_range(0..EmojiKind::ALL.len())];
            pool.spawn(&mut physics, request(kind), &mut rng);
            if step % 37 == 0 {
                pool.evict_oldest(&mut physics);
            }

            assert!(pool.len() <= pool.capacity());
            assert_eq!(physics.dynamic_body_count(), pool.len());
            assert_slots_dense(&pool);
        }
    }

    #[test]
    fn clear_all_zeroes_counts_but_keeps_registry() {
        let mut physics = PhysicsWorld::new();
        let mut pool = EmojiPool::new(10);
        let mut rng = SmallRng::seed_from_u64(3);
        for kind in [EmojiKind::Grinning, EmojiKind::TongueOut, EmojiKind::Grinning] {
            pool.spawn(&mut physics, request(kind), &mut rng);
        }

        pool.clear_all(&mut physics);

        assert!(pool.is_empty());
        assert_eq!(physics.dynamic_body_count(), 0);
        assert_eq!(pool.registry().len(), 2);
        assert_eq!(pool.registry().count(EmojiKind::Grinning), 0);

        let again = pool.spawn(&mut physics, request(EmojiKind::Grinning), &mut rng);
        assert_eq!(again.slot, 0);
    }

    #[test]
    fn evict_on_empty_pool_is_none() {
        let mut physics = PhysicsWorld::new();
        let mut pool = EmojiPool::default();

        assert_eq!(pool.evict_oldest(&mut physics), None);
        assert_eq!(pool.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn slot_poses_report_live_bodies() {
        let mut physics = PhysicsWorld::new();
        let mut pool = EmojiPool::new(5);
        let mut rng = SmallRng::seed_from_u64(11);

        let instance = pool.spawn(&mut physics, request(EmojiKind::Dizzy), &mut rng);
        let poses = pool.slot_poses(EmojiKind::Dizzy, &physics);

        assert_eq!(poses.len(), 1);
        assert_eq!(poses[0].unwrap().position, [0.0, 0.0]);
        assert!(physics.contains(instance.body));
    }

    #[test]
    fn registry_keeps_first_use_order() {
        let mut registry = CategoryRegistry::default();
        registry.register(EmojiKind::Sunglasses);
        registry.register(EmojiKind::Grinning);
        registry.register(EmojiKind::Sunglasses).count += 2;

        let kinds: Vec<_> = registry.kinds().collect();
        assert_eq!(kinds, vec![EmojiKind::Sunglasses, EmojiKind::Grinning]);
        assert_eq!(registry.count(EmojiKind::Sunglasses), 2);
        assert!(registry.get(EmojiKind::Dizzy).is_none());
    }
}
