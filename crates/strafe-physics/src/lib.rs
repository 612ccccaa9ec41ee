//! Strafe Physics - Physics world and terrain queries using rapier3d
//!
//! Owns collision shapes, the narrow phase, and the query pipeline. The
//! movement controller talks to it through two surfaces: the character
//! body (spawn, resize, velocity, teleport) and the terrain query adapter
//! in [`query`].

pub mod query;

pub use query::{ShapeCast, SurfaceContact};

use glam::Vec3;
use nalgebra::Unit;
use rapier3d::prelude::*;
use tracing::{debug, trace};

/// Physics world configuration
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity applied to dynamic bodies. The character is kinematic and
    /// integrates its own gravity in the solver.
    pub gravity: Vec3,
    /// Physics timestep (default: 1/60)
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            timestep: 1.0 / 60.0,
        }
    }
}

/// Handles for the character's kinematic body and its capsule collider.
#[derive(Debug, Clone, Copy)]
pub struct CharacterBody {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    pub config: PhysicsConfig,

    /// Rigid body storage
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,
    /// Impulse joint storage
    pub impulse_joint_set: ImpulseJointSet,
    /// Multi-body joint storage
    pub multibody_joint_set: MultibodyJointSet,

    /// Integration parameters
    integration_parameters: IntegrationParameters,
    /// Physics pipeline
    physics_pipeline: PhysicsPipeline,
    /// Island manager
    island_manager: IslandManager,
    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,
    /// Narrow phase collision detection
    pub(crate) narrow_phase: NarrowPhase,
    /// Continuous collision detection solver
    ccd_solver: CCDSolver,
    /// Query pipeline for raycasts and shape casts
    pub(crate) query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.timestep;

        Self {
            config,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Step the physics simulation
    pub fn step(&mut self) {
        let gravity = vector![self.config.gravity.x, self.config.gravity.y, self.config.gravity.z];

        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        // Update query pipeline after physics step
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a static collider (ground, walls, etc.)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.collider_set.insert(collider)
    }

    /// Spawn the character: a velocity-based kinematic body with a capsule
    /// collider. `feet` is the lowest point of the capsule; the body origin
    /// sits at the capsule center.
    ///
    /// Kinematic-vs-fixed contact generation is enabled explicitly; the
    /// ground test reads those contacts from the narrow phase.
    pub fn spawn_character(&mut self, feet: Vec3, height: f32, radius: f32) -> CharacterBody {
        let half_height = ((height - 2.0 * radius) / 2.0).max(0.01);
        let center = feet + Vec3::Y * (height / 2.0);

        let body = RigidBodyBuilder::kinematic_velocity_based()
            .translation(vector![center.x, center.y, center.z])
            .build();
        let collider = ColliderBuilder::capsule_y(half_height, radius)
            .friction(0.0) // Smooth sliding against walls
            .restitution(0.0)
            .active_collision_types(
                ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_FIXED,
            )
            .build();

        let body_handle = self.rigid_body_set.insert(body);
        let collider_handle = self.collider_set.insert_with_parent(
            collider,
            body_handle,
            &mut self.rigid_body_set,
        );
        debug!(?feet, height, radius, "spawned kinematic character body");

        CharacterBody {
            body: body_handle,
            collider: collider_handle,
        }
    }

    /// Reshape the character capsule for a new height, keeping the feet
    /// position fixed by recomputing the body origin.
    pub fn resize_character(
        &mut self,
        character: &CharacterBody,
        feet: Vec3,
        height: f32,
        radius: f32,
    ) {
        let half_height = ((height - 2.0 * radius) / 2.0).max(0.01);
        if let Some(collider) = self.collider_set.get_mut(character.collider) {
            collider.set_shape(SharedShape::capsule_y(half_height, radius));
        }
        self.set_body_translation(character, feet, height);
        trace!(height, "resized character capsule");
    }

    /// Inject the solver's velocity for this tick.
    pub fn set_body_velocity(&mut self, character: &CharacterBody, velocity: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(character.body) {
            body.set_linvel(vector![velocity.x, velocity.y, velocity.z], true);
        }
    }

    /// Teleport the character so its feet land at `feet`.
    pub fn set_body_translation(&mut self, character: &CharacterBody, feet: Vec3, height: f32) {
        if let Some(body) = self.rigid_body_set.get_mut(character.body) {
            let center = feet + Vec3::Y * (height / 2.0);
            body.set_translation(vector![center.x, center.y, center.z], true);
        }
    }

    /// Feet position of the character, derived from the body origin.
    pub fn character_feet(&self, character: &CharacterBody, height: f32) -> Vec3 {
        self.rigid_body_set
            .get(character.body)
            .map(|body| {
                let t = body.translation();
                Vec3::new(t.x, t.y - height / 2.0, t.z)
            })
            .unwrap_or(Vec3::ZERO)
    }

    /// Current linear velocity of the character body.
    pub fn character_velocity(&self, character: &CharacterBody) -> Vec3 {
        self.rigid_body_set
            .get(character.body)
            .map(|body| {
                let v = body.linvel();
                Vec3::new(v.x, v.y, v.z)
            })
            .unwrap_or(Vec3::ZERO)
    }

    /// Create a ground plane collider
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .friction(0.7)
            .restitution(0.0)
            .build();
        self.add_static_collider(ground)
    }

    /// Create a static box collider
    pub fn create_static_box(&mut self, half_extents: Vec3, position: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .friction(0.7)
            .build();
        self.add_static_collider(collider)
    }

    /// Rebuild query acceleration structures without stepping. Needed when
    /// colliders were added or moved outside of `step`.
    pub fn refresh_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
