//! Fountain bursts: a click plans a handful of spawns staggered a few
//! milliseconds apart, and holding the button repeats a smaller burst.

use std::f32::consts::TAU;
use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

use super::emoji::EmojiKind;
use super::pool::SpawnRequest;

pub const FOUNTAIN_FORCE: f32 = 4.0;
pub const CONTINUOUS_INTERVAL: Duration = Duration::from_millis(80);

const CONTINUOUS_COUNT: usize = 3;
const BURST_MIN: usize = 8;
const BURST_MAX: usize = 14;
const CONTINUOUS_SPREAD: f32 = 0.5;
const BURST_SPREAD: f32 = 1.0;
const CONTINUOUS_STAGGER_MS: u64 = 10;
const BURST_STAGGER_MS: u64 = 20;
const ANGLE_JITTER: f32 = 0.3;
const UPWARD_KICK: f32 = 2.0;

/// One planned spawn. The kind is chosen when it fires, not when planned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledSpawn {
    pub delay: Duration,
    pub position: [f32; 2],
    pub velocity: [f32; 2],
}

impl ScheduledSpawn {
    pub fn into_request(self, kind: EmojiKind) -> SpawnRequest {
        SpawnRequest {
            position: self.position,
            velocity: self.velocity,
            kind,
        }
    }
}

pub fn plan_fountain<R: Rng + ?Sized>(
    origin: [f32; 2],
    continuous: bool,
    rng: &mut R,
) -> Vec<ScheduledSpawn> {
    let (count, spread, stagger) = if continuous {
        (CONTINUOUS_COUNT, CONTINUOUS_SPREAD, CONTINUOUS_STAGGER_MS)
    } else {
        (
            rng.gen_range(BURST_MIN..=BURST_MAX),
            BURST_SPREAD,
            BURST_STAGGER_MS,
        )
    };

    (0..count)
        .map(|i| {
            let angle = rng.gen::<f32>() * TAU;
            let distance = rng.gen::<f32>() * spread;
            let magnitude = FOUNTAIN_FORCE * (0.5 + rng.gen::<f32>() * 0.5);
            let heading = angle + (rng.gen::<f32>() - 0.5) * ANGLE_JITTER;
            let kick = rng.gen::<f32>() * UPWARD_KICK;

            ScheduledSpawn {
                delay: Duration::from_millis(i as u64 * stagger),
                position: [
                    origin[0] + angle.cos() * distance,
                    origin[1] + angle.sin() * distance,
                ],
                velocity: [heading.cos() * magnitude, heading.sin() * magnitude + kick],
            }
        })
        .collect()
}

/// Pending spawns keyed by the elapsed time they become due.
#[derive(Resource, Debug, Default)]
pub struct SpawnQueue {
    pending: Vec<(Duration, ScheduledSpawn)>,
}

impl SpawnQueue {
    pub fn schedule(&mut self, now: Duration, spawns: impl IntoIterator<Item = ScheduledSpawn>) {
        self.pending
            .extend(spawns.into_iter().map(|spawn| (now + spawn.delay, spawn)));
    }

    /// Remove and return every spawn due at `now`, earliest first.
    pub fn take_due(&mut self, now: Duration) -> Vec<ScheduledSpawn> {
        let mut due = Vec::new();
        self.pending.retain(|(at, spawn)| {
            if *at <= now {
                due.push((*at, *spawn));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, spawn)| spawn).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Press-and-hold state: the pointer position in world units and when the
/// next continuous burst is due.
#[derive(Resource, Debug, Default)]
pub struct ContinuousSpawner {
    pub held: bool,
    pub position: [f32; 2],
    next_due: Duration,
}

impl ContinuousSpawner {
    pub fn press(&mut self, now: Duration, position: [f32; 2]) {
        self.held = true;
        self.position = position;
        self.next_due = now + CONTINUOUS_INTERVAL;
    }

    pub fn release(&mut self) {
        self.held = false;
    }

    /// True once per elapsed interval while held.
    pub fn tick(&mut self, now: Duration) -> bool {
        if !self.held || now < self.next_due {
            return false;
        }
        self.next_due = now + CONTINUOUS_INTERVAL;
        true
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn burst_plans_between_eight_and_fourteen_spawns() {
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..50 {
            let plan = plan_fountain([0.0, 0.0], false, &mut rng);
            assert!((BURST_MIN..=BURST_MAX).contains(&plan.len()));
            assert_eq!(plan[1].delay, Duration::from_millis(20));
        }
    }

    #[test]
    fn continuous_plan_is_three_tight_spawns() {
        let mut rng = SmallRng::seed_from_u64(9);
        let plan = plan_fountain([3.0, -2.0], true, &mut rng);

        assert_eq!(plan.len(), 3);
        assert_eq!(plan[2].delay, Duration::from_millis(20));
        for spawn in &plan {
            let dx = spawn.position[0] - 3.0;
            let dy = spawn.position[1] + 2.0;
            assert!(dx.hypot(dy) <= CONTINUOUS_SPREAD + 1e-5);
        }
    }

    #[test]
    fn planned_speed_stays_within_fountain_force() {
        let mut rng = SmallRng::seed_from_u64(13);
        let plan = plan_fountain([0.0, 0.0], false, &mut rng);

        for spawn in plan {
            let [vx, vy] = spawn.velocity;
            // The upward kick adds at most 2 on top of the force.
            assert!(vx.abs() <= FOUNTAIN_FORCE + 1e-5);
            assert!(vy <= FOUNTAIN_FORCE + UPWARD_KICK + 1e-5);
        }
    }

    #[test]
    fn queue_releases_spawns_in_due_order() {
        let mut rng = SmallRng::seed_from_u64(21);
        let mut queue = SpawnQueue::default();
        let plan = plan_fountain([0.0, 0.0], false, &mut rng);
        let total = plan.len();
        queue.schedule(Duration::from_secs(1), plan);

        assert!(queue.take_due(Duration::from_millis(999)).is_empty());
        assert_eq!(queue.take_due(Duration::from_millis(1020)).len(), 2);
        assert_eq!(queue.take_due(Duration::from_secs(5)).len(), total - 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn continuous_spawner_fires_once_per_interval_while_held() {
        let mut spawner = ContinuousSpawner::default();
        assert!(!spawner.tick(Duration::from_secs(1)));

        spawner.press(Duration::ZERO, [1.0, 1.0]);
        assert!(!spawner.tick(Duration::from_millis(50)));
        assert!(spawner.tick(Duration::from_millis(80)));
        assert!(!spawner.tick(Duration::from_millis(100)));
        assert!(spawner.tick(Duration::from_millis(160)));

        spawner.release();
        assert!(!spawner.tick(Duration::from_secs(10)));
    }
}
