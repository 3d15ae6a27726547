use glam::Vec3;
use hubworld_common::BodyTag;
use rapier3d::prelude::*;
use std::collections::HashMap;

/// World gravity, meters per second squared.
const GRAVITY: f32 = -9.81;

/// Player capsule dimensions and mass.
const PLAYER_CAPSULE_HALF_HEIGHT: f32 = 0.6;
const PLAYER_CAPSULE_RADIUS: f32 = 0.4;
const PLAYER_MASS: f32 = 1.0;

/// Errors from physics-world operations.
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    #[error("player body has not been spawned")]
    NoPlayerBody,
    #[error("player body already spawned")]
    PlayerAlreadySpawned,
    #[error("unknown sensor collider")]
    UnknownSensor,
}

/// A sensor volume the player started overlapping during the last step,
/// resolved to the sensor's gameplay tag.
#[derive(Debug, Clone)]
pub struct SensorHit {
    pub sensor: ColliderHandle,
    pub tag: BodyTag,
}

struct PlayerHandles {
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

/// Owns the rapier sets and pipelines plus the tag table mapping colliders
/// back to gameplay meaning. Gameplay code never touches rapier types other
/// than the handles this façade returns.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    tags: HashMap<ColliderHandle, BodyTag>,
    player: Option<PlayerHandles>,
    event_collector: ChannelEventCollector,
    collision_recv: crossbeam_channel::Receiver<CollisionEvent>,
    contact_force_recv: crossbeam_channel::Receiver<ContactForceEvent>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let (collision_send, collision_recv) = crossbeam_channel::unbounded();
        let (contact_force_send, contact_force_recv) = crossbeam_channel::unbounded();
        Self {
            gravity: vector![0.0, GRAVITY, 0.0],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            tags: HashMap::new(),
            player: None,
            event_collector: ChannelEventCollector::new(collision_send, contact_force_send),
            collision_recv,
            contact_force_recv,
        }
    }

    /// Spawn the player capsule: dynamic, rotations locked so the capsule
    /// stays upright.
    pub fn spawn_player(&mut self, position: Vec3) -> Result<RigidBodyHandle, PhysicsError> {
        if self.player.is_some() {
            return Err(PhysicsError::PlayerAlreadySpawned);
        }

        let body = RigidBodyBuilder::dynamic()
            .translation(to_na(position))
            .lock_rotations()
            .build();
        let body_handle = self.bodies.insert(body);

        let collider = ColliderBuilder::capsule_y(PLAYER_CAPSULE_HALF_HEIGHT, PLAYER_CAPSULE_RADIUS)
            .mass(PLAYER_MASS)
            .build();
        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        self.tags.insert(collider_handle, BodyTag::Player);
        self.player = Some(PlayerHandles {
            body: body_handle,
            collider: collider_handle,
        });
        tracing::info!(?position, "player body spawned");
        Ok(body_handle)
    }

    /// Spawn a fixed cuboid collider (ground, rocks).
    pub fn spawn_fixed_cuboid(
        &mut self,
        tag: BodyTag,
        position: Vec3,
        half_extents: Vec3,
    ) -> ColliderHandle {
        let body = RigidBodyBuilder::fixed().translation(to_na(position)).build();
        let body_handle = self.bodies.insert(body);
        let collider =
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build();
        let handle = self
            .colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);
        self.tags.insert(handle, tag);
        handle
    }

    /// Spawn a fixed sensor volume that reports the player entering it.
    pub fn spawn_sensor(
        &mut self,
        tag: BodyTag,
        position: Vec3,
        half_extents: Vec3,
    ) -> ColliderHandle {
        let body = RigidBodyBuilder::fixed().translation(to_na(position)).build();
        let body_handle = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .sensor(true)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let handle = self
            .colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);
        tracing::debug!(?tag, ?position, "sensor spawned");
        self.tags.insert(handle, tag);
        handle
    }

    /// Remove a sensor and its carrier body (e.g. a collected crystal).
    pub fn remove_sensor(&mut self, handle: ColliderHandle) -> Result<(), PhysicsError> {
        let parent = self
            .colliders
            .get(handle)
            .and_then(|c| c.parent())
            .ok_or(PhysicsError::UnknownSensor)?;
        self.bodies.remove(
            parent,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        self.tags.remove(&handle);
        Ok(())
    }

    pub fn player_linvel(&self) -> Result<Vec3, PhysicsError> {
        Ok(to_glam(self.player_body()?.linvel()))
    }

    pub fn set_player_linvel(&mut self, velocity: Vec3) -> Result<(), PhysicsError> {
        self.player_body_mut()?.set_linvel(to_na(velocity), true);
        Ok(())
    }

    pub fn apply_player_impulse(&mut self, impulse: Vec3) -> Result<(), PhysicsError> {
        self.player_body_mut()?.apply_impulse(to_na(impulse), true);
        Ok(())
    }

    pub fn player_translation(&self) -> Result<Vec3, PhysicsError> {
        Ok(to_glam(self.player_body()?.translation()))
    }

    /// Teleport the player and zero its velocity (session reset).
    pub fn set_player_translation(&mut self, position: Vec3) -> Result<(), PhysicsError> {
        let body = self.player_body_mut()?;
        body.set_translation(to_na(position), true);
        body.set_linvel(vector![0.0, 0.0, 0.0], true);
        Ok(())
    }

    /// Advance the simulation one tick and return the sensor overlaps that
    /// started during it, already filtered to player-vs-sensor pairs.
    pub fn step(&mut self, dt: f32) -> Vec<SensorHit> {
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        let mut hits = Vec::new();
        while let Ok(event) = self.collision_recv.try_recv() {
            if let CollisionEvent::Started(a, b, _) = event {
                if let Some(hit) = self.resolve_hit(a, b) {
                    hits.push(hit);
                }
            }
        }
        // Contact force events are not consumed; keep the channel drained.
        while self.contact_force_recv.try_recv().is_ok() {}
        hits
    }

    fn resolve_hit(&self, a: ColliderHandle, b: ColliderHandle) -> Option<SensorHit> {
        let player = self.player.as_ref()?;
        let sensor = if a == player.collider {
            b
        } else if b == player.collider {
            a
        } else {
            return None;
        };
        let tag = self.tags.get(&sensor)?;
        match tag {
            BodyTag::Teleporter { .. } | BodyTag::Crystal { .. } => Some(SensorHit {
                sensor,
                tag: tag.clone(),
            }),
            BodyTag::Player | BodyTag::Scenery => None,
        }
    }

    fn player_body(&self) -> Result<&RigidBody, PhysicsError> {
        let handles = self.player.as_ref().ok_or(PhysicsError::NoPlayerBody)?;
        self.bodies.get(handles.body).ok_or(PhysicsError::NoPlayerBody)
    }

    fn player_body_mut(&mut self) -> Result<&mut RigidBody, PhysicsError> {
        let handles = self.player.as_ref().ok_or(PhysicsError::NoPlayerBody)?;
        self.bodies
            .get_mut(handles.body)
            .ok_or(PhysicsError::NoPlayerBody)
    }
}

fn to_na(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn to_glam(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hubworld_common::{AreaId, ItemId};

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn player_queries_fail_before_spawn() {
        let world = PhysicsWorld::new();
        assert!(matches!(
            world.player_translation(),
            Err(PhysicsError::NoPlayerBody)
        ));
    }

    #[test]
    fn player_cannot_be_spawned_twice() {
        let mut world = PhysicsWorld::new();
        world.spawn_player(Vec3::new(0.0, 1.2, 0.0)).unwrap();
        assert!(matches!(
            world.spawn_player(Vec3::ZERO),
            Err(PhysicsError::PlayerAlreadySpawned)
        ));
    }

    #[test]
    fn gravity_pulls_the_player_down() {
        let mut world = PhysicsWorld::new();
        world.spawn_player(Vec3::new(0.0, 10.0, 0.0)).unwrap();
        for _ in 0..30 {
            world.step(DT);
        }
        let pos = world.player_translation().unwrap();
        assert!(pos.y < 10.0);
        assert!(world.player_linvel().unwrap().y < 0.0);
    }

    #[test]
    fn ground_stops_the_fall() {
        let mut world = PhysicsWorld::new();
        world.spawn_fixed_cuboid(
            BodyTag::Scenery,
            Vec3::ZERO,
            Vec3::new(100.0, 0.1, 100.0),
        );
        world.spawn_player(Vec3::new(0.0, 2.0, 0.0)).unwrap();
        for _ in 0..240 {
            world.step(DT);
        }
        let pos = world.player_translation().unwrap();
        // Resting on the slab: capsule half height + radius above y=0.1
        assert!(pos.y > 0.5 && pos.y < 1.5);
    }

    #[test]
    fn horizontal_velocity_moves_the_player() {
        let mut world = PhysicsWorld::new();
        world.spawn_fixed_cuboid(
            BodyTag::Scenery,
            Vec3::ZERO,
            Vec3::new(100.0, 0.1, 100.0),
        );
        world.spawn_player(Vec3::new(0.0, 1.2, 0.0)).unwrap();
        for _ in 0..60 {
            world.set_player_linvel(Vec3::new(6.0, 0.0, 0.0)).unwrap();
            world.step(DT);
        }
        let pos = world.player_translation().unwrap();
        assert!(pos.x > 3.0);
    }

    #[test]
    fn sensor_reports_player_entering() {
        let mut world = PhysicsWorld::new();
        world.spawn_player(Vec3::new(0.0, 1.0, 0.0)).unwrap();
        world.spawn_sensor(
            BodyTag::Crystal {
                item: ItemId::from("elemental-crystal"),
            },
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::splat(0.7),
        );
        let hits = world.step(DT);
        assert_eq!(hits.len(), 1);
        assert!(matches!(hits[0].tag, BodyTag::Crystal { .. }));
    }

    #[test]
    fn sensor_does_not_rereport_while_inside() {
        let mut world = PhysicsWorld::new();
        world.spawn_player(Vec3::new(0.0, 1.0, 0.0)).unwrap();
        world.spawn_sensor(
            BodyTag::Teleporter {
                area: AreaId::from("crystal-cavern"),
            },
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.2, 2.4, 0.8),
        );
        let first = world.step(DT);
        assert_eq!(first.len(), 1);
        let second = world.step(DT);
        assert!(second.is_empty());
    }

    #[test]
    fn removed_sensor_stops_reporting() {
        let mut world = PhysicsWorld::new();
        world.spawn_player(Vec3::new(0.0, 1.0, 0.0)).unwrap();
        let sensor = world.spawn_sensor(
            BodyTag::Crystal {
                item: ItemId::from("elemental-crystal"),
            },
            Vec3::new(0.0, 50.0, 0.0),
            Vec3::splat(0.7),
        );
        world.step(DT);
        world.remove_sensor(sensor).unwrap();
        // Teleport the player where the sensor used to be
        world
            .set_player_translation(Vec3::new(0.0, 50.0, 0.0))
            .unwrap();
        let hits = world.step(DT);
        assert!(hits.is_empty());
    }

    #[test]
    fn remove_unknown_sensor_is_an_error() {
        let mut world = PhysicsWorld::new();
        let sensor = world.spawn_sensor(
            BodyTag::Scenery,
            Vec3::ZERO,
            Vec3::splat(1.0),
        );
        world.remove_sensor(sensor).unwrap();
        assert!(matches!(
            world.remove_sensor(sensor),
            Err(PhysicsError::UnknownSensor)
        ));
    }
}
