use glam::Vec3;
use hubworld_kernel::HubState;
use hubworld_sim::{DoorSpec, HubLayout};

// Prop palette, RGBA.
const COLOR_ROCK: [f32; 4] = [0.20, 0.26, 0.33, 1.0];
const COLOR_DOOR_OPEN: [f32; 4] = [0.13, 0.83, 0.93, 1.0];
const COLOR_DOOR_LOCKED: [f32; 4] = [0.28, 0.33, 0.41, 1.0];
const COLOR_MARKER_OPEN: [f32; 4] = [0.98, 0.45, 0.09, 1.0];
const COLOR_MARKER_LOCKED: [f32; 4] = [0.39, 0.45, 0.55, 1.0];
const COLOR_CRYSTAL: [f32; 4] = [0.98, 0.75, 0.14, 1.0];
const COLOR_PLAYER: [f32; 4] = [0.22, 0.74, 0.97, 1.0];

/// One axis-aligned cube instance for the GPU backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropInstance {
    pub position: Vec3,
    pub scale: Vec3,
    pub color: [f32; 4],
}

/// Build the prop list for the current state: rocks, door slabs colored by
/// accessibility, the crystal while it is uncollected, and the player proxy.
pub fn scene_props(layout: &HubLayout, state: &HubState) -> Vec<PropInstance> {
    let mut props = Vec::new();

    for rock in &layout.rocks {
        props.push(PropInstance {
            position: rock.position,
            scale: Vec3::splat(1.6 * rock.scale),
            color: COLOR_ROCK,
        });
    }

    for door in &layout.doors {
        let accessible = door.is_accessible(state);
        props.push(PropInstance {
            position: door.position + Vec3::new(0.0, 2.0, 0.0),
            scale: Vec3::new(2.4, 4.5, 0.5),
            color: if accessible {
                COLOR_DOOR_OPEN
            } else {
                COLOR_DOOR_LOCKED
            },
        });
        // Floating marker above the frame
        props.push(PropInstance {
            position: door.position + Vec3::new(0.0, 4.2, 0.0),
            scale: Vec3::splat(0.5),
            color: if accessible {
                COLOR_MARKER_OPEN
            } else {
                COLOR_MARKER_LOCKED
            },
        });
    }

    if !state.has_item(&layout.crystal.item) {
        props.push(PropInstance {
            position: layout.crystal.position,
            scale: Vec3::splat(0.8),
            color: COLOR_CRYSTAL,
        });
    }

    props.push(PropInstance {
        position: state.position(),
        scale: Vec3::new(0.7, 2.0, 0.7),
        color: COLOR_PLAYER,
    });

    props
}

/// Door caption, with the prerequisite spelled out while it is locked.
pub fn door_label(door: &DoorSpec, state: &HubState) -> String {
    if door.is_accessible(state) {
        door.label.clone()
    } else {
        let requirement = door
            .requirement
            .as_ref()
            .map(|r| r.as_str())
            .unwrap_or_default();
        format!("{} (Requires {requirement})", door.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hubworld_common::{AreaId, ItemId};

    #[test]
    fn crystal_prop_disappears_when_collected() {
        let layout = HubLayout::hub();
        let mut state = HubState::new();

        let before = scene_props(&layout, &state);
        assert!(before.iter().any(|p| p.color == COLOR_CRYSTAL));

        state.collect_item(ItemId::from("elemental-crystal"));
        let after = scene_props(&layout, &state);
        assert!(!after.iter().any(|p| p.color == COLOR_CRYSTAL));
        assert_eq!(after.len(), before.len() - 1);
    }

    #[test]
    fn door_color_tracks_accessibility() {
        let layout = HubLayout::hub();
        let mut state = HubState::new();

        let locked = scene_props(&layout, &state);
        assert_eq!(
            locked.iter().filter(|p| p.color == COLOR_DOOR_LOCKED).count(),
            1
        );

        state.unlock_area(AreaId::from("crystal-cavern"));
        let unlocked = scene_props(&layout, &state);
        assert!(!unlocked.iter().any(|p| p.color == COLOR_DOOR_LOCKED));
    }

    #[test]
    fn player_proxy_follows_state_position() {
        let layout = HubLayout::hub();
        let mut state = HubState::new();
        state.set_position(Vec3::new(3.0, 1.1, -2.0));

        let props = scene_props(&layout, &state);
        let player = props.last().unwrap();
        assert_eq!(player.position, Vec3::new(3.0, 1.1, -2.0));
        assert_eq!(player.color, COLOR_PLAYER);
    }

    #[test]
    fn locked_door_label_names_the_requirement() {
        let layout = HubLayout::hub();
        let state = HubState::new();
        let garden = &layout.doors[1];
        assert_eq!(
            door_label(garden, &state),
            "Sky Garden (Requires crystal-cavern)"
        );
        let cavern = &layout.doors[0];
        assert_eq!(door_label(cavern, &state), "Crystal Cavern");
    }
}
