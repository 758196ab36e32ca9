//! Orbit camera controller with damped input.
//!
//! The controller orbits a look-at target on a yaw/pitch sphere. Mouse
//! input feeds angular/zoom velocities that decay exponentially each
//! frame, matching the damped feel of the original orbit interaction.

use glam::{Vec2, Vec3};
use wgpu::util::DeviceExt;

use crate::camera::core::{Camera, CameraUniform};
use crate::gpu::render_context::RenderContext;
use crate::options::CameraOptions;

/// Vertical lift of the eye above the framing target, in meters.
const FRAME_EYE_LIFT: f32 = 0.3;

/// Fixed eye distance along +Z when framing a figure, in meters.
const FRAME_EYE_DISTANCE: f32 = 5.5;

/// Pitch clamp keeping the orbit clear of the poles.
const PITCH_LIMIT: f32 = 1.5;

/// A derived camera placement: where to look and from where.
///
/// Recomputed once per successful figure load from the post-scale
/// bounding-box height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    /// Look-at target at the figure's vertical midpoint.
    pub target: Vec3,
    /// Eye position: slightly above the target, fixed distance back.
    pub eye: Vec3,
}

impl CameraFrame {
    /// Frame a figure of scaled bounding-box height `h`.
    ///
    /// Returns `None` for a degenerate height (`h <= 0` or non-finite), in
    /// which case the caller retains its prior camera state.
    #[must_use]
    pub fn for_figure_height(h: f32) -> Option<Self> {
        if !(h.is_finite() && h > 0.0) {
            return None;
        }
        let center_y = h / 2.0;
        Some(Self {
            target: Vec3::new(0.0, center_y, 0.0),
            eye: Vec3::new(0.0, center_y + FRAME_EYE_LIFT, FRAME_EYE_DISTANCE),
        })
    }
}

/// Eye position on the orbit sphere around `target`.
#[must_use]
pub fn orbit_eye(target: Vec3, yaw: f32, pitch: f32, distance: f32) -> Vec3 {
    let dir = Vec3::new(
        yaw.sin() * pitch.cos(),
        pitch.sin(),
        yaw.cos() * pitch.cos(),
    );
    target + dir * distance
}

/// Orbit camera state plus its GPU uniform resources.
pub struct OrbitController {
    yaw: f32,
    pitch: f32,
    distance: f32,
    target: Vec3,

    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,

    options: CameraOptions,

    /// The camera driven by this controller.
    pub camera: Camera,
    /// CPU copy of the camera uniform.
    pub uniform: CameraUniform,
    /// GPU uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Bind group layout shared with render pipelines.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group binding [`Self::buffer`].
    pub bind_group: wgpu::BindGroup,

    /// Left mouse button held (rotating).
    pub rotate_pressed: bool,
    /// Right mouse button held (panning).
    pub pan_pressed: bool,
}

impl OrbitController {
    /// Create a controller with GPU resources on `context`, starting from
    /// the pre-load placement (eye at `(0, 1.6, 5.0)` looking at
    /// `(0, 1.0, 0)`).
    #[must_use]
    pub fn new(context: &RenderContext, options: &CameraOptions) -> Self {
        let target = Vec3::new(0.0, 1.0, 0.0);
        let eye = Vec3::new(0.0, 1.6, 5.0);
        let (yaw, pitch, distance) = spherical_from(target, eye);

        let camera = Camera {
            eye,
            target,
            up: Vec3::Y,
            aspect: context.config.width as f32
                / context.config.height.max(1) as f32,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        };

        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);

        let buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                    label: Some("Camera Bind Group"),
                });

        Self {
            yaw,
            pitch,
            distance,
            target,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
            options: options.clone(),
            camera,
            uniform,
            buffer,
            layout,
            bind_group,
            rotate_pressed: false,
            pan_pressed: false,
        }
    }

    /// Feed a mouse-drag rotation delta (pixels).
    pub fn rotate(&mut self, delta: Vec2) {
        self.yaw_velocity -= delta.x * self.options.rotate_speed;
        self.pitch_velocity -= delta.y * self.options.rotate_speed;
    }

    /// Feed a mouse-drag pan delta (pixels). Pans the orbit target in the
    /// camera plane.
    pub fn pan(&mut self, delta: Vec2) {
        let forward = (self.target - self.camera.eye).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        self.target += right * (-delta.x * self.options.pan_speed)
            + up * (delta.y * self.options.pan_speed);
        self.update_camera_pos();
    }

    /// Feed a scroll-wheel zoom delta.
    pub fn zoom(&mut self, delta: f32) {
        self.zoom_velocity += delta * self.options.zoom_speed;
    }

    /// Advance damping: integrate pending velocities and decay them.
    /// Called once per render tick.
    pub fn update(&mut self, dt: f32) {
        self.yaw += self.yaw_velocity;
        self.pitch =
            (self.pitch + self.pitch_velocity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.distance = (self.distance * (1.0 - self.zoom_velocity)).clamp(
            self.options.min_distance,
            self.options.max_distance,
        );

        // Frame-rate independent exponential decay, normalized to 60 Hz.
        let decay = self.options.damping.powf(dt * 60.0);
        self.yaw_velocity *= decay;
        self.pitch_velocity *= decay;
        self.zoom_velocity *= decay;

        self.update_camera_pos();
    }

    /// Snap the controller to a derived [`CameraFrame`]. Resets any orbit
    /// offset accumulated on the previous figure.
    pub fn apply_frame(&mut self, frame: &CameraFrame) {
        self.target = frame.target;
        let (yaw, pitch, distance) = spherical_from(frame.target, frame.eye);
        self.yaw = yaw;
        self.pitch = pitch;
        self.distance = distance
            .clamp(self.options.min_distance, self.options.max_distance);
        self.yaw_velocity = 0.0;
        self.pitch_velocity = 0.0;
        self.zoom_velocity = 0.0;

        // Use the frame's exact eye rather than the spherical round trip.
        self.camera.target = frame.target;
        self.camera.eye = frame.eye;
    }

    /// Update the viewport aspect ratio. Zero-sized dimensions are
    /// ignored, leaving the projection unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.aspect =
            updated_aspect(self.camera.aspect, width, height);
    }

    /// Push the current camera state to the GPU uniform buffer.
    pub fn update_gpu(&mut self, queue: &wgpu::Queue) {
        self.uniform.update_view_proj(&self.camera);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[
            self.uniform,
        ]));
    }

    fn update_camera_pos(&mut self) {
        self.camera.target = self.target;
        self.camera.eye =
            orbit_eye(self.target, self.yaw, self.pitch, self.distance);
    }
}

/// New aspect ratio for a viewport resize. A zero dimension keeps the
/// current aspect.
fn updated_aspect(current: f32, width: u32, height: u32) -> f32 {
    if width > 0 && height > 0 {
        width as f32 / height as f32
    } else {
        current
    }
}

/// Decompose an eye position into `(yaw, pitch, distance)` about `target`.
fn spherical_from(target: Vec3, eye: Vec3) -> (f32, f32, f32) {
    let offset = eye - target;
    let distance = offset.length().max(f32::EPSILON);
    let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
    let yaw = offset.x.atan2(offset.z);
    (yaw, pitch, distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_targets_the_vertical_midpoint() {
        let frame = CameraFrame::for_figure_height(1.8).unwrap();
        assert_eq!(frame.target, Vec3::new(0.0, 0.9, 0.0));
        assert_eq!(frame.eye, Vec3::new(0.0, 1.2, 5.5));
    }

    #[test]
    fn frame_eye_is_fixed_distance_and_lift() {
        for h in [0.5f32, 1.0, 1.75, 1.851_428_5, 3.2] {
            let frame = CameraFrame::for_figure_height(h).unwrap();
            assert_eq!(frame.target.y, h / 2.0);
            assert_eq!(frame.eye.z, 5.5);
            assert!((frame.eye.y - (frame.target.y + 0.3)).abs() < 1e-6);
        }
    }

    #[test]
    fn worked_example_framing() {
        // height=180, waist=90 over a 1.8m raw figure
        let scaled_height = 1.8 * (1.8 / 1.75);
        let frame = CameraFrame::for_figure_height(scaled_height).unwrap();
        assert!((frame.target.y - 0.925_714).abs() < 1e-4);
        assert!((frame.eye.y - 1.225_714).abs() < 1e-4);
        assert_eq!(frame.eye.z, 5.5);
    }

    #[test]
    fn degenerate_height_skips_framing() {
        assert_eq!(CameraFrame::for_figure_height(0.0), None);
        assert_eq!(CameraFrame::for_figure_height(-1.0), None);
        assert_eq!(CameraFrame::for_figure_height(f32::NAN), None);
    }

    #[test]
    fn spherical_round_trips_the_frame_eye() {
        let frame = CameraFrame::for_figure_height(1.8).unwrap();
        let (yaw, pitch, distance) = spherical_from(frame.target, frame.eye);
        let eye = orbit_eye(frame.target, yaw, pitch, distance);
        assert!((eye - frame.eye).length() < 1e-4);
    }

    #[test]
    fn zero_sized_resize_keeps_the_aspect() {
        assert_eq!(updated_aspect(1.6, 0, 720), 1.6);
        assert_eq!(updated_aspect(1.6, 1280, 0), 1.6);
        assert_eq!(updated_aspect(1.6, 1280, 720), 1280.0 / 720.0);
    }

    #[test]
    fn orbit_eye_stays_on_the_sphere() {
        let target = Vec3::new(0.0, 0.9, 0.0);
        for yaw in [0.0f32, 0.7, -2.1] {
            for pitch in [0.0f32, 0.4, -1.2] {
                let eye = orbit_eye(target, yaw, pitch, 5.5);
                assert!(((eye - target).length() - 5.5).abs() < 1e-4);
            }
        }
    }
}
