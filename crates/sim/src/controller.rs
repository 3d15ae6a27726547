use glam::Vec3;
use hubworld_input::MovementFlags;
use hubworld_kernel::HubState;
use hubworld_physics::{PhysicsError, PhysicsWorld};

/// Base walking speed, units per second.
pub const MOVEMENT_SPEED: f32 = 6.0;
/// Speed factor while sprint is held.
pub const SPRINT_MULTIPLIER: f32 = 1.6;
/// Upward impulse applied on a jump.
pub const JUMP_IMPULSE: f32 = 4.5;
/// A jump only triggers while vertical speed is below this, i.e. the body
/// is neither rising nor falling.
pub const JUMP_VERTICAL_EPSILON: f32 = 0.05;

/// Desired horizontal velocity for the current movement flags.
///
/// Zero-length input (no directional key held, or opposing keys cancelling)
/// has no direction to normalize; it must come out as zero velocity, never
/// as NaN components.
pub fn desired_horizontal_velocity(flags: &MovementFlags) -> Vec3 {
    let direction = Vec3::new(
        axis(flags.right) - axis(flags.left),
        0.0,
        axis(flags.backward) - axis(flags.forward),
    );
    let speed = MOVEMENT_SPEED * if flags.sprint { SPRINT_MULTIPLIER } else { 1.0 };
    match direction.try_normalize() {
        Some(dir) => dir * speed,
        None => Vec3::ZERO,
    }
}

fn axis(held: bool) -> f32 {
    if held { 1.0 } else { 0.0 }
}

/// One controller tick: write the desired horizontal velocity to the player
/// body (preserving vertical velocity), apply a jump impulse when resting,
/// and copy the body's translation back into the store.
pub fn tick(
    physics: &mut PhysicsWorld,
    flags: &MovementFlags,
    state: &mut HubState,
) -> Result<(), PhysicsError> {
    let velocity = physics.player_linvel()?;
    let horizontal = desired_horizontal_velocity(flags);
    physics.set_player_linvel(Vec3::new(horizontal.x, velocity.y, horizontal.z))?;

    if flags.jump && velocity.y.abs() < JUMP_VERTICAL_EPSILON {
        physics.apply_player_impulse(Vec3::new(0.0, JUMP_IMPULSE, 0.0))?;
    }

    state.set_position(physics.player_translation()?);
    Ok(())
}
