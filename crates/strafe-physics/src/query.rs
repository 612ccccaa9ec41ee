//! Terrain query adapter
//!
//! Translates rapier shape casts, overlap tests and narrow-phase contacts
//! into the simple structs the kinematic solver consumes. A query finding
//! nothing is a normal negative result: casts encode it as fraction 1.0,
//! overlap tests as an empty list.

use glam::Vec3;
use rapier3d::parry;
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::prelude::*;

use crate::{CharacterBody, PhysicsWorld};

/// Outcome of a shape cast along a motion vector.
#[derive(Debug, Clone, Copy)]
pub struct ShapeCast {
    /// Fraction of the requested motion completed before first contact,
    /// in [0, 1]. 1.0 means the motion finished unobstructed.
    pub fraction: f32,
    /// World-space outward normal of the surface that was hit.
    pub normal: Option<Vec3>,
}

impl ShapeCast {
    /// An unobstructed cast.
    pub fn clear() -> Self {
        Self {
            fraction: 1.0,
            normal: None,
        }
    }

    /// Whether the cast hit anything before completing its motion.
    pub fn hit(&self) -> bool {
        self.normal.is_some()
    }
}

/// A single overlap or narrow-phase contact against the character.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceContact {
    /// World-space normal pointing out of the touched surface, toward the
    /// character.
    pub normal: Vec3,
    /// World-space position of the touched collider.
    pub point: Vec3,
    /// The collider that was touched.
    pub collider: ColliderHandle,
}

impl PhysicsWorld {
    /// Sweep `shape` from `from` along `motion`, returning the fraction of
    /// the motion completed before first contact and the touched surface's
    /// outward normal.
    pub fn cast_shape_motion(
        &self,
        shape: &dyn Shape,
        from: Vec3,
        motion: Vec3,
        exclude: Option<&CharacterBody>,
    ) -> ShapeCast {
        let length = motion.length();
        if length <= f32::EPSILON {
            return ShapeCast::clear();
        }
        let dir = motion / length;

        let pos = Isometry::translation(from.x, from.y, from.z);
        let vel = vector![dir.x, dir.y, dir.z];
        // A cast that starts touching (or slightly inside) geometry but
        // moves away must not report an immediate hit; the step sweep
        // begins flush against the floor every grounded tick.
        let options = ShapeCastOptions {
            max_time_of_impact: length,
            target_distance: 0.0,
            stop_at_penetration: false,
            compute_impact_geometry_on_penetration: true,
        };
        let mut filter = QueryFilter::default();
        if let Some(character) = exclude {
            filter = filter.exclude_rigid_body(character.body);
        }

        match self.query_pipeline.cast_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &pos,
            &vel,
            shape,
            options,
            filter,
        ) {
            Some((_, hit)) => {
                // normal1 is the touched collider's outward normal, in
                // world space.
                let n = hit.normal1;
                ShapeCast {
                    fraction: (hit.time_of_impact / length).clamp(0.0, 1.0),
                    normal: Some(Vec3::new(n.x, n.y, n.z)),
                }
            }
            None => ShapeCast::clear(),
        }
    }

    /// All colliders overlapping `shape` placed at `pos`, with contact
    /// normals and positions. Used for wall sliding and the uncrouch
    /// clearance probe.
    pub fn intersect_shape(
        &self,
        shape: &dyn Shape,
        pos: Vec3,
        exclude: Option<&CharacterBody>,
    ) -> Vec<SurfaceContact> {
        let shape_pos = Isometry::translation(pos.x, pos.y, pos.z);
        let mut filter = QueryFilter::default();
        if let Some(character) = exclude {
            filter = filter.exclude_rigid_body(character.body);
        }

        let mut handles = Vec::new();
        self.query_pipeline.intersections_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &shape_pos,
            shape,
            filter,
            |handle| {
                handles.push(handle);
                true
            },
        );

        let mut contacts = Vec::new();
        for handle in handles {
            let Some(collider) = self.collider_set.get(handle) else {
                continue;
            };
            let contact = parry::query::contact(
                &shape_pos,
                shape,
                collider.position(),
                collider.shape(),
                0.0,
            );
            if let Ok(Some(contact)) = contact {
                // normal2 points out of the touched collider.
                let n = contact.normal2;
                let t = collider.translation();
                contacts.push(SurfaceContact {
                    normal: Vec3::new(n.x, n.y, n.z),
                    point: Vec3::new(t.x, t.y, t.z),
                    collider: handle,
                });
            }
        }
        contacts
    }

    /// Current narrow-phase contacts touching the character, normals
    /// oriented toward the character.
    pub fn body_contacts(&self, character: &CharacterBody) -> Vec<SurfaceContact> {
        let mut contacts = Vec::new();
        for pair in self.narrow_phase.contact_pairs_with(character.collider) {
            if !pair.has_any_active_contact {
                continue;
            }
            let (ours_first, other) = if pair.collider1 == character.collider {
                (true, pair.collider2)
            } else {
                (false, pair.collider1)
            };
            let other_pos = self
                .collider_set
                .get(other)
                .map(|c| {
                    let t = c.translation();
                    Vec3::new(t.x, t.y, t.z)
                })
                .unwrap_or(Vec3::ZERO);

            for manifold in &pair.manifolds {
                if manifold.points.is_empty() {
                    continue;
                }
                // The manifold normal points out of the first collider.
                let mut normal = Vec3::new(
                    manifold.data.normal.x,
                    manifold.data.normal.y,
                    manifold.data.normal.z,
                );
                if ours_first {
                    normal = -normal;
                }
                contacts.push(SurfaceContact {
                    normal,
                    point: other_pos,
                    collider: other,
                });
            }
        }
        contacts
    }

    /// Number of narrow-phase contacts currently touching the character.
    pub fn body_contact_count(&self, character: &CharacterBody) -> usize {
        self.body_contacts(character).len()
    }
}
