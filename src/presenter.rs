//! Measurement-driven figure presentation.
//!
//! The [`Presenter`] owns everything the original page held in globals:
//! render context, orbit camera, lighting, the installed figure, and the
//! load state machine. A presentation request derives scale factors from
//! its measurements, decodes the figure on a background thread, swaps it
//! in (releasing the prior figure's GPU buffers), and reframes the camera
//! from the scaled bounding box.
//!
//! Requests arriving while a load is in flight are queued: the latest
//! request replaces any previously queued one and starts when the active
//! load completes. A failed load leaves the displayed figure untouched.

use std::sync::mpsc::{Receiver, TryRecvError};

use glam::Vec3;

use crate::camera::{CameraFrame, OrbitController};
use crate::error::MannequinError;
use crate::figure::{
    spawn_figure_load, Aabb, FigureCategory, FigureData, LoadEvent,
};
use crate::gpu::render_context::RenderContext;
use crate::measurements::MeasurementSet;
use crate::options::Options;
use crate::renderer::{FigureRenderer, Lighting};
use crate::util::FrameTiming;

/// A presentation request: which figure to show, sized how.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PresentRequest {
    /// Which of the two fixed figures to load.
    pub category: FigureCategory,
    /// Body measurements driving the non-uniform scale.
    pub measurements: MeasurementSet,
}

/// Lifecycle of the presenter's load state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresenterPhase {
    /// No request has been made yet.
    #[default]
    Idle,
    /// A figure decode is in flight.
    Loading,
    /// The most recent request completed and its figure is displayed.
    Ready,
    /// The most recent request failed; any prior figure is still shown.
    Failed,
}

/// Metadata for the figure currently on display.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentedFigure {
    /// Category the figure was loaded for.
    pub category: FigureCategory,
    /// Per-axis scale applied to the figure.
    pub scale: Vec3,
    /// Number of mesh primitives (matches the GPU buffer count).
    pub mesh_count: usize,
    /// World-space bounding box after scaling.
    pub bounds: Aabb,
}

/// What [`PresentationState::begin`] decided to do with a request.
enum Begin {
    /// Start loading this request now.
    Start(PresentRequest),
    /// A load is in flight; the request was queued (replacing any
    /// previously queued request).
    Queued,
}

/// The pure load/replace state machine, separated from GPU resources so
/// the replacement and queuing invariants are testable without a window.
#[derive(Debug, Default)]
struct PresentationState {
    phase: PresenterPhase,
    figure: Option<PresentedFigure>,
    queued: Option<PresentRequest>,
    last_error: Option<String>,
}

impl PresentationState {
    fn begin(&mut self, request: PresentRequest) -> Begin {
        if self.phase == PresenterPhase::Loading {
            if self.queued.replace(request).is_some() {
                log::info!("replacing queued presentation request");
            }
            return Begin::Queued;
        }
        self.phase = PresenterPhase::Loading;
        Begin::Start(request)
    }

    /// Record a successful load. Returns the mesh count of the replaced
    /// figure (0 when none), which must equal the number of GPU meshes
    /// released by the renderer swap.
    fn finish_ok(&mut self, figure: PresentedFigure) -> usize {
        let released =
            self.figure.replace(figure).map_or(0, |prior| prior.mesh_count);
        self.phase = PresenterPhase::Ready;
        self.last_error = None;
        released
    }

    /// Record a failed load. The displayed figure is left untouched.
    fn finish_err(&mut self, message: String) {
        self.phase = PresenterPhase::Failed;
        self.last_error = Some(message);
    }

    fn take_queued(&mut self) -> Option<PresentRequest> {
        self.queued.take()
    }
}

/// An in-flight background load.
struct PendingLoad {
    request: PresentRequest,
    rx: Receiver<LoadEvent>,
}

/// Owns the render context, camera, lighting, and figure state for one
/// presentation surface.
pub struct Presenter {
    /// The wgpu device/queue/surface bundle.
    pub context: RenderContext,
    /// Orbit camera with damped input.
    pub camera_controller: OrbitController,
    lighting: Lighting,
    figure_renderer: FigureRenderer,
    #[cfg(feature = "viewer")]
    input_handler: crate::camera::InputHandler,
    frame_timing: FrameTiming,
    depth_view: wgpu::TextureView,
    options: Options,
    state: PresentationState,
    pending: Option<PendingLoad>,
}

impl Presenter {
    /// Create a presenter rendering to `window` with default options.
    ///
    /// # Errors
    ///
    /// Returns [`MannequinError::Gpu`] when GPU initialization fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
    ) -> Result<Self, MannequinError> {
        Self::with_options(window, initial_size, Options::default()).await
    }

    /// Create a presenter with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`MannequinError::Gpu`] when GPU initialization fails.
    pub async fn with_options(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
        options: Options,
    ) -> Result<Self, MannequinError> {
        let context = RenderContext::new(window, initial_size).await?;
        let camera_controller =
            OrbitController::new(&context, &options.camera);
        let lighting = Lighting::new(&context);
        let figure_renderer = FigureRenderer::new(
            &context,
            &camera_controller.layout,
            &lighting.layout,
        );
        let depth_view = create_depth_view(&context);
        let frame_timing = FrameTiming::new(options.display.target_fps);

        Ok(Self {
            context,
            camera_controller,
            lighting,
            figure_renderer,
            #[cfg(feature = "viewer")]
            input_handler: crate::camera::InputHandler::new(),
            frame_timing,
            depth_view,
            options,
            state: PresentationState::default(),
            pending: None,
        })
    }

    /// Submit a presentation request.
    ///
    /// Starts a background decode when idle; queues the request when a
    /// load is already in flight (latest request wins).
    pub fn present(&mut self, request: PresentRequest) {
        log::info!(
            "presenting {:?} figure with measurements {:?}",
            request.category,
            request.measurements,
        );
        match self.state.begin(request) {
            Begin::Start(request) => {
                let rx = spawn_figure_load(request.category);
                self.pending = Some(PendingLoad { request, rx });
            }
            Begin::Queued => {
                log::info!("load in flight; request queued");
            }
        }
    }

    /// Advance one frame: drain load events, then damp the orbit camera.
    pub fn update(&mut self, dt: f32) {
        self.poll_loads();
        self.camera_controller.update(dt);
    }

    /// Drain events from an in-flight load and apply its result.
    fn poll_loads(&mut self) {
        loop {
            let Some(pending) = &self.pending else { return };
            match pending.rx.try_recv() {
                Ok(LoadEvent::Progress(fraction)) => {
                    log::debug!(
                        "figure loading: {:.0}%",
                        fraction * 100.0
                    );
                }
                Ok(LoadEvent::Finished(result)) => {
                    if let Some(pending) = self.pending.take() {
                        self.complete_load(&pending.request, *result);
                    }
                    break;
                }
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => {
                    self.pending = None;
                    self.state.finish_err(
                        "figure load thread terminated unexpectedly".into(),
                    );
                    break;
                }
            }
        }

        // A request queued during the load starts now.
        if let Some(request) = self.state.take_queued() {
            self.present(request);
        }
    }

    fn complete_load(
        &mut self,
        request: &PresentRequest,
        result: Result<FigureData, MannequinError>,
    ) {
        match result {
            Ok(figure) => {
                let scale = request.measurements.scale_factors().to_vec3();
                let released =
                    self.figure_renderer.install(&self.context, &figure, scale);
                if released > 0 {
                    log::debug!("released {released} prior figure meshes");
                }

                let bounds = figure.bounds.scaled(scale);
                let prior_meshes = self.state.finish_ok(PresentedFigure {
                    category: request.category,
                    scale,
                    mesh_count: figure.mesh_count(),
                    bounds,
                });
                debug_assert_eq!(prior_meshes, released);

                // Reframe exactly once per successful load, after scaling.
                // A degenerate box keeps the prior camera placement.
                if let Some(frame) =
                    CameraFrame::for_figure_height(bounds.height())
                {
                    self.camera_controller.apply_frame(&frame);
                } else {
                    log::warn!(
                        "degenerate figure bounds; keeping prior camera"
                    );
                }

                log::info!(
                    "figure ready: scale XZ={:.2} Y={:.2}, scaled height {:.2}m",
                    scale.x,
                    scale.y,
                    bounds.height(),
                );
            }
            Err(e) => {
                log::error!("{e}");
                self.state.finish_err(e.to_string());
            }
        }
    }

    /// Render one frame. Skips ahead of the FPS cap; otherwise clears to
    /// the background color and draws the installed figure, if any.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] when the swapchain texture cannot
    /// be acquired (caller typically resizes and retries).
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if !self.frame_timing.should_render() {
            return Ok(());
        }

        self.camera_controller.update_gpu(&self.context.queue);
        self.lighting.update_gpu(&self.context.queue);

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();

        {
            let [r, g, b] = self.options.display.background;
            let mut render_pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Figure Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color {
                                    r: f64::from(r),
                                    g: f64::from(g),
                                    b: f64::from(b),
                                    a: 1.0,
                                }),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth_view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

            self.figure_renderer.draw(
                &mut render_pass,
                &self.camera_controller.bind_group,
                &self.lighting.bind_group,
            );
        }

        self.context.submit(encoder);
        frame.present();
        self.frame_timing.end_frame();
        Ok(())
    }

    /// Resize the presentation surface. Zero-sized dimensions leave both
    /// the camera aspect ratio and the surface untouched.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context.resize(width, height);
        self.camera_controller.resize(width, height);
        self.depth_view = create_depth_view(&self.context);
    }

    /// Forward a window event to the orbit camera. Returns true if the
    /// event was consumed.
    #[cfg(feature = "viewer")]
    pub fn handle_window_event(
        &mut self,
        event: &winit::event::WindowEvent,
    ) -> bool {
        self.input_handler
            .handle_event(&mut self.camera_controller, event)
    }

    /// Current phase of the load state machine.
    #[must_use]
    pub fn phase(&self) -> PresenterPhase {
        self.state.phase
    }

    /// The figure currently displayed, if any.
    #[must_use]
    pub fn presented_figure(&self) -> Option<&PresentedFigure> {
        self.state.figure.as_ref()
    }

    /// The most recent load failure, shown in place of the figure by the
    /// embedding UI.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error.as_deref()
    }

    /// The options this presenter was created with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }
}

fn create_depth_view(context: &RenderContext) -> wgpu::TextureView {
    let texture = context.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: context.config.width,
            height: context.config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figure_meta(mesh_count: usize, height: f32) -> PresentedFigure {
        let mut bounds = Aabb::EMPTY;
        bounds.extend(Vec3::new(-0.4, 0.0, -0.2));
        bounds.extend(Vec3::new(0.4, height, 0.2));
        PresentedFigure {
            category: FigureCategory::Man,
            scale: Vec3::ONE,
            mesh_count,
            bounds,
        }
    }

    #[test]
    fn replacement_releases_exactly_the_prior_meshes() {
        let mut state = PresentationState::default();

        assert!(matches!(
            state.begin(PresentRequest::default()),
            Begin::Start(_)
        ));
        assert_eq!(state.finish_ok(figure_meta(3, 1.8)), 0);

        assert!(matches!(
            state.begin(PresentRequest::default()),
            Begin::Start(_)
        ));
        // Second success releases the first figure's three meshes, and
        // exactly one figure remains live.
        assert_eq!(state.finish_ok(figure_meta(5, 1.7)), 3);
        assert_eq!(state.figure.as_ref().map(|f| f.mesh_count), Some(5));
        assert_eq!(state.phase, PresenterPhase::Ready);
    }

    #[test]
    fn request_during_load_is_queued_and_latest_wins() {
        let mut state = PresentationState::default();
        assert!(matches!(
            state.begin(PresentRequest::default()),
            Begin::Start(_)
        ));
        assert_eq!(state.phase, PresenterPhase::Loading);

        let woman = PresentRequest {
            category: FigureCategory::Woman,
            measurements: MeasurementSet::default(),
        };
        assert!(matches!(state.begin(PresentRequest::default()), Begin::Queued));
        assert!(matches!(state.begin(woman.clone()), Begin::Queued));

        let _ = state.finish_ok(figure_meta(2, 1.8));
        // Only the latest queued request survives.
        assert_eq!(state.take_queued(), Some(woman));
        assert_eq!(state.take_queued(), None);
    }

    #[test]
    fn failure_keeps_the_displayed_figure() {
        let mut state = PresentationState::default();
        assert!(matches!(
            state.begin(PresentRequest::default()),
            Begin::Start(_)
        ));
        let _ = state.finish_ok(figure_meta(4, 1.8));

        assert!(matches!(
            state.begin(PresentRequest::default()),
            Begin::Start(_)
        ));
        state.finish_err("asset missing".into());

        assert_eq!(state.phase, PresenterPhase::Failed);
        assert_eq!(state.last_error.as_deref(), Some("asset missing"));
        // Prior figure untouched
        assert_eq!(state.figure.as_ref().map(|f| f.mesh_count), Some(4));
    }

    #[test]
    fn success_clears_a_previous_error() {
        let mut state = PresentationState::default();
        assert!(matches!(
            state.begin(PresentRequest::default()),
            Begin::Start(_)
        ));
        state.finish_err("first attempt failed".into());
        assert_eq!(state.phase, PresenterPhase::Failed);

        assert!(matches!(
            state.begin(PresentRequest::default()),
            Begin::Start(_)
        ));
        let _ = state.finish_ok(figure_meta(1, 1.6));
        assert_eq!(state.phase, PresenterPhase::Ready);
        assert_eq!(state.last_error, None);
    }
}
