//! Orbit-style camera state for the star field: rotation and zoom chase their
//! targets a fixed fraction per tick, with a slow auto-spin on top.

use std::f32::consts::FRAC_PI_2;

use crate::data::loader::DETAIL_ZOOM_THRESHOLD;

pub const ZOOM_MIN: f32 = 0.0;
pub const ZOOM_MAX: f32 = 6.0;
pub const INITIAL_ZOOM: f32 = 5.5;

const APPROACH: f32 = 0.1;
const TIME_STEP: f32 = 0.01;
const SPIN_PITCH: f32 = 0.0001;
const SPIN_YAW: f32 = 0.001;

pub const MOUSE_SENSITIVITY: f32 = 0.0015;
pub const TOUCH_SENSITIVITY: f32 = 0.01;
pub const WHEEL_ZOOM_SCALE: f32 = 0.001;
pub const KEY_ZOOM_STEP: f32 = 0.1;
pub const KEY_YAW_STEP: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraController {
    /// `(pitch, yaw)` applied to the point cloud.
    pub rotation: (f32, f32),
    pub target_rotation: (f32, f32),
    /// Camera distance along +Z.
    pub zoom: f32,
    pub target_zoom: f32,
    /// Shader clock, advanced once per tick.
    pub time: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            rotation: (0.0, 0.0),
            target_rotation: (0.0, 0.0),
            zoom: INITIAL_ZOOM,
            target_zoom: INITIAL_ZOOM,
            time: 0.0,
        }
    }
}

impl CameraController {
    /// One tick of exponential approach toward the targets.
    pub fn advance(&mut self) {
        self.time += TIME_STEP;
        let (pitch, yaw) = self.rotation;
        let (target_pitch, target_yaw) = self.target_rotation;
        self.rotation = (
            pitch + (target_pitch - pitch) * APPROACH + self.time * SPIN_PITCH,
            yaw + (target_yaw - yaw) * APPROACH + self.time * SPIN_YAW,
        );
        self.zoom += (self.target_zoom - self.zoom) * APPROACH;
    }

    /// Pointer drag in pixels. Pitch is clamped to straight up / down.
    pub fn drag(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.target_rotation.1 += dx * sensitivity;
        self.target_rotation.0 =
            (self.target_rotation.0 + dy * sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    pub fn nudge_yaw(&mut self, delta: f32) {
        self.target_rotation.1 += delta;
    }

    /// Additive zoom (wheel, arrow keys). Returns true when the target is
    /// below the detail threshold afterwards.
    pub fn zoom_by(&mut self, delta: f32) -> bool {
        self.set_target_zoom(self.target_zoom + delta)
    }

    /// Pinch gesture: spreading fingers (`scale > 1`) zooms in.
    pub fn pinch(&mut self, scale: f32) -> bool {
        if scale <= 0.0 || !scale.is_finite() {
            return self.wants_detail();
        }
        self.set_target_zoom(self.target_zoom / scale)
    }

    pub fn wants_detail(&self) -> bool {
        self.target_zoom < DETAIL_ZOOM_THRESHOLD
    }

    fn set_target_zoom(&mut self, zoom: f32) -> bool {
        self.target_zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        self.wants_detail()
    }
}
