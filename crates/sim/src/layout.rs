use glam::Vec3;
use hubworld_common::{AreaId, ItemId};
use hubworld_kernel::HubState;

/// Sensor volume of a teleporter door, half extents.
pub const DOOR_SENSOR_HALF_EXTENTS: Vec3 = Vec3::new(1.2, 2.4, 0.8);

/// A teleporter door: fixed sensor at `position`, unlocks `target_area`
/// when an accessible door is touched by the player.
#[derive(Debug, Clone)]
pub struct DoorSpec {
    pub label: String,
    pub position: Vec3,
    pub target_area: AreaId,
    /// Area that must already be unlocked before this door responds.
    pub requirement: Option<AreaId>,
}

impl DoorSpec {
    /// Accessible when there is no prerequisite, or it is already unlocked.
    pub fn is_accessible(&self, state: &HubState) -> bool {
        self.requirement
            .as_ref()
            .is_none_or(|req| state.is_area_unlocked(req))
    }
}

/// A crater rock: fixed scenery cuboid.
#[derive(Debug, Clone, Copy)]
pub struct RockSpec {
    pub position: Vec3,
    pub scale: f32,
}

impl RockSpec {
    pub fn collider_half_extents(&self) -> Vec3 {
        Vec3::new(0.9 * self.scale, 0.6 * self.scale, 0.9 * self.scale)
    }
}

/// The collectible crystal: renders and senses only until collected.
#[derive(Debug, Clone)]
pub struct CrystalSpec {
    pub item: ItemId,
    pub position: Vec3,
    pub sensor_half_extents: Vec3,
}

/// Static description of the hub scene. Both the physics spawn and the
/// prop view derive from this one structure.
#[derive(Debug, Clone)]
pub struct HubLayout {
    pub player_spawn: Vec3,
    /// Ground slab half extents, centered at the origin.
    pub ground_half_extents: Vec3,
    pub rocks: Vec<RockSpec>,
    pub doors: Vec<DoorSpec>,
    pub crystal: CrystalSpec,
}

impl HubLayout {
    /// The central plaza: a 200x200 terrain patch, a ring of twelve crater
    /// rocks, two teleporter doors, and the elemental crystal.
    pub fn hub() -> Self {
        let rocks = (0..12)
            .map(|i| {
                let angle = i as f32 / 12.0 * std::f32::consts::TAU;
                let radius = 8.0 + (i % 3) as f32;
                RockSpec {
                    position: Vec3::new(angle.cos() * radius, 0.5, angle.sin() * radius),
                    scale: 0.8,
                }
            })
            .collect();

        Self {
            player_spawn: Vec3::new(0.0, 1.2, 0.0),
            ground_half_extents: Vec3::new(100.0, 0.1, 100.0),
            rocks,
            doors: vec![
                DoorSpec {
                    label: "Crystal Cavern".to_owned(),
                    position: Vec3::new(10.0, 0.0, -6.0),
                    target_area: AreaId::from("crystal-cavern"),
                    requirement: None,
                },
                DoorSpec {
                    label: "Sky Garden".to_owned(),
                    position: Vec3::new(-8.0, 0.0, 12.0),
                    target_area: AreaId::from("sky-garden"),
                    requirement: Some(AreaId::from("crystal-cavern")),
                },
            ],
            crystal: CrystalSpec {
                item: ItemId::from("elemental-crystal"),
                position: Vec3::new(2.0, 1.5, 2.0),
                sensor_half_extents: Vec3::splat(0.7),
            },
        }
    }
}
