// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Graphics allowances — casts between f32/f64/u32 are pervasive and intended
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::module_name_repetitions)]

//! Measurement-driven 3D humanoid viewer built on wgpu.
//!
//! Mannequin loads one of two fixed glTF humanoid figures, scales it
//! non-uniformly from user-supplied body measurements (height drives the
//! vertical axis, waist drives both horizontal axes), frames an orbit
//! camera from the scaled figure's bounding box, and renders continuously.
//!
//! # Key entry points
//!
//! - [`presenter::Presenter`] - owns the scene, camera, and figure state
//! - [`measurements::MeasurementSet`] - body measurements in centimeters
//! - [`figure::FigureCategory`] - which of the two humanoid assets to load
//! - [`options::Options`] - runtime configuration (camera, display)
//!
//! # Architecture
//!
//! Figure decoding runs on a background thread; the presenter polls a
//! channel from the frame loop and swaps the displayed figure in when a
//! load completes, releasing the previous figure's GPU buffers. All
//! mutable state lives in the [`presenter::Presenter`] — there are no
//! process-wide globals, so multiple independent presenters can coexist
//! and the core scale/framing logic is testable without a window.

pub mod camera;
pub mod error;
pub mod figure;
pub mod gpu;
pub mod measurements;
pub mod options;
pub mod presenter;
pub mod renderer;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use error::MannequinError;
pub use figure::FigureCategory;
pub use measurements::{MeasurementSet, ScaleFactors};
pub use presenter::{PresentRequest, Presenter, PresenterPhase};
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
