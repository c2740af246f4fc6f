//! Orbit navigation and named view presets

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

use crate::camera::Camera;

/// Distance from the origin for the named view presets.
pub const VIEW_RADIUS: f32 = 3.0;

/// Named camera directions selectable from the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewDirection {
    Front,
    Top,
    Side,
    Back,
}

impl ViewDirection {
    /// Parse a direction name; unknown names yield None (treated as no-op).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Front" => Some(ViewDirection::Front),
            "Top" => Some(ViewDirection::Top),
            "Side" => Some(ViewDirection::Side),
            "Back" => Some(ViewDirection::Back),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ViewDirection::Front => "Front",
            ViewDirection::Top => "Top",
            ViewDirection::Side => "Side",
            ViewDirection::Back => "Back",
        }
    }

    /// Orbit angles (yaw, pitch) placing the eye on the preset axis.
    fn angles(&self) -> (f32, f32) {
        match self {
            ViewDirection::Front => (0.0, 0.0),
            ViewDirection::Top => (0.0, FRAC_PI_2),
            ViewDirection::Side => (FRAC_PI_2, 0.0),
            ViewDirection::Back => (PI, 0.0),
        }
    }

    pub fn all() -> &'static [ViewDirection] {
        &[
            ViewDirection::Front,
            ViewDirection::Top,
            ViewDirection::Side,
            ViewDirection::Back,
        ]
    }
}

/// Pointer-driven orbit control around a target point, with velocity
/// damping applied every frame.
#[derive(Debug, Clone)]
pub struct OrbitController {
    target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,
    damping: f32,
    rotate_speed: f32,
    zoom_speed: f32,
}

impl OrbitController {
    const MIN_DISTANCE: f32 = 0.2;
    const MAX_DISTANCE: f32 = 100.0;

    /// Start from the camera's initial pose.
    pub fn new(camera: &Camera) -> Self {
        let offset = camera.eye - camera.target;
        let distance = offset.length().max(Self::MIN_DISTANCE);
        Self {
            target: camera.target,
            yaw: offset.z.atan2(offset.x),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
            damping: 0.12,
            rotate_speed: 0.008,
            zoom_speed: 0.1,
        }
    }

    /// Feed a pointer drag delta (pixels).
    pub fn handle_drag(&mut self, dx: f32, dy: f32) {
        self.yaw_velocity += dx * self.rotate_speed;
        self.pitch_velocity += dy * self.rotate_speed;
    }

    /// Feed a scroll delta (positive zooms in).
    pub fn handle_zoom(&mut self, delta: f32) {
        self.zoom_velocity -= delta * self.zoom_speed;
    }

    /// Integrate velocities and apply damping. Returns true if the pose moved.
    pub fn update(&mut self) -> bool {
        let moving = self.yaw_velocity.abs() > 1e-5
            || self.pitch_velocity.abs() > 1e-5
            || self.zoom_velocity.abs() > 1e-5;

        if moving {
            self.yaw += self.yaw_velocity;
            self.pitch = (self.pitch + self.pitch_velocity).clamp(-FRAC_PI_2, FRAC_PI_2);
            self.distance = (self.distance * (1.0 + self.zoom_velocity))
                .clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);

            let keep = 1.0 - self.damping;
            self.yaw_velocity *= keep;
            self.pitch_velocity *= keep;
            self.zoom_velocity *= keep;
        }

        moving
    }

    /// Snap to a named preset: fixed radius, looking at the origin.
    pub fn apply_direction(&mut self, direction: ViewDirection) {
        let (yaw, pitch) = direction.angles();
        self.target = Vec3::ZERO;
        self.yaw = yaw;
        self.pitch = pitch;
        self.distance = VIEW_RADIUS;
        self.yaw_velocity = 0.0;
        self.pitch_velocity = 0.0;
        self.zoom_velocity = 0.0;
    }

    pub fn eye(&self) -> Vec3 {
        let dir = Vec3::new(
            self.pitch.cos() * self.yaw.cos(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.sin(),
        );
        self.target + dir * self.distance
    }

    /// Write the orbit pose into the camera.
    pub fn apply_to(&self, camera: &mut Camera) {
        camera.eye = self.eye();
        camera.target = self.target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> OrbitController {
        OrbitController::new(&Camera::new(1.0))
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(ViewDirection::from_name("Front"), Some(ViewDirection::Front));
        assert_eq!(ViewDirection::from_name("Top"), Some(ViewDirection::Top));
        assert_eq!(ViewDirection::from_name("Side"), Some(ViewDirection::Side));
        assert_eq!(ViewDirection::from_name("Back"), Some(ViewDirection::Back));
        assert_eq!(ViewDirection::from_name(""), None);
        assert_eq!(ViewDirection::from_name("top"), None);
        assert_eq!(ViewDirection::from_name("Diagonal"), None);
    }

    #[test]
    fn test_top_preset_lands_on_y_axis() {
        let mut orbit = controller();
        // Disturb the pose first; the preset must win regardless
        orbit.handle_drag(250.0, -120.0);
        orbit.update();

        orbit.apply_direction(ViewDirection::Top);
        let eye = orbit.eye();
        assert!(eye.x.abs() < 1e-5);
        assert!(eye.z.abs() < 1e-5);
        assert!((eye.y - VIEW_RADIUS).abs() < 1e-5);

        let mut camera = Camera::new(1.0);
        orbit.apply_to(&mut camera);
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn test_presets_land_on_expected_axes() {
        let mut orbit = controller();
        let cases = [
            (ViewDirection::Front, Vec3::new(VIEW_RADIUS, 0.0, 0.0)),
            (ViewDirection::Side, Vec3::new(0.0, 0.0, VIEW_RADIUS)),
            (ViewDirection::Back, Vec3::new(-VIEW_RADIUS, 0.0, 0.0)),
        ];
        for (direction, expected) in cases {
            orbit.apply_direction(direction);
            assert!((orbit.eye() - expected).length() < 1e-4, "{direction:?}");
        }
    }

    #[test]
    fn test_preset_zeroes_momentum() {
        let mut orbit = controller();
        orbit.handle_drag(300.0, 300.0);
        orbit.apply_direction(ViewDirection::Front);
        // No residual velocity: the pose stays put on subsequent frames
        assert!(!orbit.update());
        assert!((orbit.eye() - Vec3::new(VIEW_RADIUS, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_damping_settles() {
        let mut orbit = controller();
        orbit.handle_drag(50.0, 0.0);
        let mut frames = 0;
        while orbit.update() {
            frames += 1;
            assert!(frames < 1000, "damping never settled");
        }
        assert!(frames > 1);
    }

    #[test]
    fn test_drag_moves_eye() {
        let mut orbit = controller();
        let before = orbit.eye();
        orbit.handle_drag(40.0, 0.0);
        orbit.update();
        assert!((orbit.eye() - before).length() > 1e-4);
    }
}
