//! Thin rapier3d world: planar dynamic discs inside four static walls,
//! advanced one fixed step at a time.

use std::num::NonZeroUsize;

use rapier3d::prelude::*;

pub use rapier3d::prelude::RigidBodyHandle as BodyHandle;

pub const FIXED_DT: f32 = 1.0 / 60.0;
pub const SOLVER_ITERATIONS: usize = 6;
pub const GRAVITY: [f32; 2] = [2.0, -10.0];
pub const WALL_THICKNESS: f32 = 2.0;

const WALL_FRICTION: f32 = 0.001;
const WALL_RESTITUTION: f32 = 0.2;
const WALL_HALF_DEPTH: f32 = 1.0;

/// Everything needed to create one emoji body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmojiBodySpec {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub angular_velocity: f32,
    pub mass: f32,
    pub radius: f32,
    pub friction: f32,
    pub restitution: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

/// Position on the XY plane plus rotation about Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyPose {
    pub position: [f32; 2],
    pub rotation_z: f32,
}

pub struct PhysicsWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    walls: Vec<ColliderHandle>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let mut params = IntegrationParameters {
            dt: FIXED_DT,
            ..IntegrationParameters::default()
        };
        params.num_solver_iterations =
            NonZeroUsize::new(SOLVER_ITERATIONS).unwrap_or(NonZeroUsize::MIN);

        Self {
            gravity: vector![GRAVITY[0], GRAVITY[1], 0.0],
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            walls: Vec::new(),
        }
    }

    /// Advance by exactly one fixed step, whatever the frame time was.
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
    }

    /// Replace the arena walls so they enclose a `width` × `height` box
    /// centered on the origin.
    pub fn set_walls(&mut self, width: f32, height: f32) {
        self.remove_walls();

        let half_w = width / 2.0;
        let half_h = height / 2.0;
        let half_t = WALL_THICKNESS / 2.0;
        let walls = [
            // bottom, top
            ([half_w, half_t], [0.0, -half_h - half_t]),
            ([half_w, half_t], [0.0, half_h + half_t]),
            // left, right
            ([half_t, half_h], [-half_w - half_t, 0.0]),
            ([half_t, half_h], [half_w + half_t, 0.0]),
        ];

        for ([hx, hy], [x, y]) in walls {
            let collider = ColliderBuilder::cuboid(hx, hy, WALL_HALF_DEPTH)
                .translation(vector![x, y, 0.0])
                .friction(WALL_FRICTION)
                .restitution(WALL_RESTITUTION)
                .build();
            self.walls.push(self.colliders.insert(collider));
        }
    }

    pub fn remove_walls(&mut self) {
        for handle in self.walls.drain(..) {
            self.colliders
                .remove(handle, &mut self.islands, &mut self.bodies, false);
        }
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Create a dynamic disc locked to the XY plane.
    pub fn add_emoji_body(&mut self, spec: EmojiBodySpec) -> BodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![spec.position[0], spec.position[1], 0.0])
            .linvel(vector![spec.velocity[0], spec.velocity[1], 0.0])
            .angvel(vector![0.0, 0.0, spec.angular_velocity])
            .linear_damping(spec.linear_damping)
            .angular_damping(spec.angular_damping)
            .enabled_translations(true, true, false)
            .enabled_rotations(false, false, true)
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::ball(spec.radius)
            .mass(spec.mass)
            .friction(spec.friction)
            .restitution(spec.restitution)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        handle
    }

    /// Remove a body and its collider. Unknown handles are ignored.
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.bodies
            .remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    pub fn body_pose(&self, handle: BodyHandle) -> Option<BodyPose> {
        let body = self.bodies.get(handle)?;
        let translation = body.translation();
        Some(BodyPose {
            position: [translation.x, translation.y],
            rotation_z: body.rotation().scaled_axis().z,
        })
    }

    /// Walls are parentless colliders, so every body is a dynamic one.
    pub fn dynamic_body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Drop every body and wall. Safe on an empty world.
    pub fn clear(&mut self) {
        let handles: Vec<_> = self.bodies.iter().map(|(handle, _)| handle).collect();
        for handle in handles {
            self.remove_body(handle);
        }
        self.remove_walls();
    }
}
