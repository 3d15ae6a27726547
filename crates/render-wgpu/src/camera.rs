use glam::{Mat4, Vec3};

/// Lowest allowed elevation above the horizon, radians. Keeps the camera
/// from dipping below the terrain plane.
const MIN_PITCH: f32 = 0.075;
const MAX_PITCH: f32 = 1.45;

const MIN_DISTANCE: f32 = 4.0;
const MAX_DISTANCE: f32 = 40.0;

/// Orbit camera: yaw/pitch/distance around a followed target (the player).
/// Panning is disabled; the target is driven by the simulation.
pub struct OrbitCamera {
    pub target: Vec3,
    pub yaw: f32,
    /// Elevation above the horizontal plane, clamped to
    /// [`MIN_PITCH`, `MAX_PITCH`].
    pub pitch: f32,
    pub distance: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
    pub zoom_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 1.0, 0.0),
            yaw: 45.0_f32.to_radians(),
            pitch: 0.6,
            distance: 14.0,
            fov: 50.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            sensitivity: 0.005,
            zoom_speed: 1.0,
        }
    }
}

impl OrbitCamera {
    /// Camera position in world space.
    pub fn eye(&self) -> Vec3 {
        let horizontal = self.distance * self.pitch.cos();
        self.target
            + Vec3::new(
                horizontal * self.yaw.cos(),
                self.distance * self.pitch.sin(),
                horizontal * self.yaw.sin(),
            )
    }

    /// Keep the orbit centered on the player.
    pub fn follow(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Mouse-drag orbit.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(MIN_PITCH, MAX_PITCH);
    }

    /// Scroll zoom, positive delta zooms in.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta * self.zoom_speed).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
