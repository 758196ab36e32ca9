//! Standalone presentation window backed by winit.
//!
//! ```no_run
//! # use mannequin::{FigureCategory, MeasurementSet, Viewer};
//! Viewer::builder()
//!     .with_category(FigureCategory::Woman)
//!     .with_measurements(MeasurementSet::from_entries([
//!         ("height", "180"),
//!         ("waist", "90"),
//!     ]))
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::{sync::Arc, time::Instant};

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    error::MannequinError, figure::FigureCategory,
    measurements::MeasurementSet, options::Options,
    presenter::PresentRequest, Presenter, PresenterPhase,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    category: FigureCategory,
    measurements: MeasurementSet,
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    /// Create a builder with sensible defaults (title "Mannequin", man
    /// figure, no measurements, default options).
    fn new() -> Self {
        Self {
            category: FigureCategory::default(),
            measurements: MeasurementSet::default(),
            options: None,
            title: "Mannequin".into(),
        }
    }

    /// Select which figure the initial presentation loads.
    #[must_use]
    pub fn with_category(mut self, category: FigureCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the measurements driving the initial presentation.
    #[must_use]
    pub fn with_measurements(mut self, measurements: MeasurementSet) -> Self {
        self.measurements = measurements;
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            request: PresentRequest {
                category: self.category,
                measurements: self.measurements,
            },
            options: self.options,
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that presents a measured figure.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    request: PresentRequest,
    options: Option<Options>,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`MannequinError::Viewer`] when the event loop cannot be
    /// created or fails while running.
    pub fn run(self) -> Result<(), MannequinError> {
        let event_loop = EventLoop::new()
            .map_err(|e| MannequinError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            presenter: None,
            last_frame_time: Instant::now(),
            request: Some(self.request),
            options: self.options,
            title: self.title,
            error_in_title: false,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| MannequinError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    last_frame_time: Instant,
    request: Option<PresentRequest>,
    options: Option<Options>,
    title: String,
    /// Whether the title currently carries a load-failure message.
    error_in_title: bool,
}

/// Clamp a window inner size to valid surface dimensions.
fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    /// Mirror the presenter's failure state into the window title, the
    /// viewer's stand-in for the original inline error message.
    fn sync_error_surface(&mut self) {
        let (Some(window), Some(presenter)) =
            (&self.window, &self.presenter)
        else {
            return;
        };
        match presenter.phase() {
            PresenterPhase::Failed if !self.error_in_title => {
                let message =
                    presenter.last_error().unwrap_or("figure load failed");
                window.set_title(&format!("{} — {message}", self.title));
                self.error_in_title = true;
            }
            PresenterPhase::Ready if self.error_in_title => {
                window.set_title(&self.title);
                self.error_in_title = false;
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(900, 1100));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let (vp_w, vp_h) = viewport_size(window.inner_size());
        let options = self.options.take().unwrap_or_default();
        let presenter_result = pollster::block_on(Presenter::with_options(
            window.clone(),
            (vp_w, vp_h),
            options,
        ));

        let mut presenter = match presenter_result {
            Ok(p) => p,
            Err(e) => {
                log::error!("failed to initialize presenter: {e}");
                event_loop.exit();
                return;
            }
        };

        if let Some(request) = self.request.take() {
            presenter.present(request);
        }

        window.request_redraw();
        self.window = Some(window);
        self.presenter = Some(presenter);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        // Guard: both window and presenter must be initialised.
        if self.window.is_none() || self.presenter.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(event_size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(event_size.width, event_size.height);
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let inner = self.window.as_ref().map(|w| w.inner_size());
                if let (Some(presenter), Some(inner)) =
                    (&mut self.presenter, inner)
                {
                    presenter.resize(inner.width, inner.height);
                }
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(self.last_frame_time).as_secs_f32();
                self.last_frame_time = now;

                if let Some(presenter) = &mut self.presenter {
                    presenter.update(dt);
                    match presenter.render() {
                        Ok(()) => {}
                        Err(
                            wgpu::SurfaceError::Outdated
                            | wgpu::SurfaceError::Lost,
                        ) => {
                            if let Some(w) = &self.window {
                                let (vp_w, vp_h) =
                                    viewport_size(w.inner_size());
                                presenter.resize(vp_w, vp_h);
                            }
                        }
                        Err(e) => {
                            log::error!("render error: {e:?}");
                        }
                    }
                }
                self.sync_error_surface();
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            event => {
                let consumed = self
                    .presenter
                    .as_mut()
                    .is_some_and(|p| p.handle_window_event(&event));
                if consumed {
                    if let Some(w) = &self.window {
                        w.request_redraw();
                    }
                }
            }
        }
    }
}
