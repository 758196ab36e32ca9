//! Body measurements and the measurement → scale-factor mapping.
//!
//! A [`MeasurementSet`] holds up to ten named body measurements in
//! centimeters. Only height and waist influence the figure transform:
//! height scales the vertical axis, waist scales both horizontal axes
//! (preserving circular symmetry about the vertical axis). The remaining
//! measurements are collected and persisted but intentionally unused — a
//! documented limitation, not a defect.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::MannequinError;

/// Height of the unscaled reference figure, in meters.
pub const REFERENCE_HEIGHT_M: f32 = 1.75;

/// Waist circumference of the unscaled reference figure, in meters.
pub const REFERENCE_WAIST_CIRCUMFERENCE_M: f32 = 0.85;

/// The fixed set of body measurements a request may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measurement {
    /// Standing height.
    Height,
    /// Body weight (collected, unused by the transform).
    Weight,
    /// Chest circumference.
    Chest,
    /// Underbust circumference.
    Underbust,
    /// Waist circumference.
    Waist,
    /// Hip circumference.
    Hips,
    /// Sleeve length.
    Sleeve,
    /// Thigh circumference.
    Thigh,
    /// Inseam length.
    Inseam,
    /// Outseam length.
    Outseam,
}

impl Measurement {
    /// All measurements, in form-field order.
    pub const ALL: [Self; 10] = [
        Self::Height,
        Self::Weight,
        Self::Chest,
        Self::Underbust,
        Self::Waist,
        Self::Hips,
        Self::Sleeve,
        Self::Thigh,
        Self::Inseam,
        Self::Outseam,
    ];

    /// Parse a measurement name as it appears in input fields and CLI
    /// arguments. Unknown names yield `None`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "height" => Some(Self::Height),
            "weight" => Some(Self::Weight),
            "chest" => Some(Self::Chest),
            "underbust" => Some(Self::Underbust),
            "waist" => Some(Self::Waist),
            "hips" => Some(Self::Hips),
            "sleeve" => Some(Self::Sleeve),
            "thigh" => Some(Self::Thigh),
            "inseam" => Some(Self::Inseam),
            "outseam" => Some(Self::Outseam),
            _ => None,
        }
    }

    /// The canonical key name for this measurement.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Height => "height",
            Self::Weight => "weight",
            Self::Chest => "chest",
            Self::Underbust => "underbust",
            Self::Waist => "waist",
            Self::Hips => "hips",
            Self::Sleeve => "sleeve",
            Self::Thigh => "thigh",
            Self::Inseam => "inseam",
            Self::Outseam => "outseam",
        }
    }
}

/// A set of body measurements in centimeters. Absent entries mean
/// "unspecified" and leave the corresponding scale axis at identity.
///
/// Serializes as flat TOML (one optional field per measurement), which is
/// also the on-disk measurement-profile format.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementSet {
    /// Standing height in cm.
    pub height: Option<f32>,
    /// Body weight in kg (collected, unused by the transform).
    pub weight: Option<f32>,
    /// Chest circumference in cm.
    pub chest: Option<f32>,
    /// Underbust circumference in cm.
    pub underbust: Option<f32>,
    /// Waist circumference in cm.
    pub waist: Option<f32>,
    /// Hip circumference in cm.
    pub hips: Option<f32>,
    /// Sleeve length in cm.
    pub sleeve: Option<f32>,
    /// Thigh circumference in cm.
    pub thigh: Option<f32>,
    /// Inseam length in cm.
    pub inseam: Option<f32>,
    /// Outseam length in cm.
    pub outseam: Option<f32>,
}

impl MeasurementSet {
    /// Build a set from raw `(key, value)` string pairs, as collected from
    /// input fields or CLI arguments.
    ///
    /// Unknown keys are skipped. Values that are empty, non-numeric,
    /// non-finite, or not strictly positive are treated as absent — never
    /// an error. The transform degrades gracefully to identity on each
    /// independent axis.
    #[must_use]
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut set = Self::default();
        for (key, value) in entries {
            let Some(measurement) = Measurement::from_key(key) else {
                log::debug!("ignoring unknown measurement key {key:?}");
                continue;
            };
            set.set(measurement, parse_cm(value));
        }
        set
    }

    /// Value of a single measurement, if present.
    #[must_use]
    pub const fn get(&self, m: Measurement) -> Option<f32> {
        match m {
            Measurement::Height => self.height,
            Measurement::Weight => self.weight,
            Measurement::Chest => self.chest,
            Measurement::Underbust => self.underbust,
            Measurement::Waist => self.waist,
            Measurement::Hips => self.hips,
            Measurement::Sleeve => self.sleeve,
            Measurement::Thigh => self.thigh,
            Measurement::Inseam => self.inseam,
            Measurement::Outseam => self.outseam,
        }
    }

    /// Set or clear a single measurement.
    pub fn set(&mut self, m: Measurement, value: Option<f32>) {
        let slot = match m {
            Measurement::Height => &mut self.height,
            Measurement::Weight => &mut self.weight,
            Measurement::Chest => &mut self.chest,
            Measurement::Underbust => &mut self.underbust,
            Measurement::Waist => &mut self.waist,
            Measurement::Hips => &mut self.hips,
            Measurement::Sleeve => &mut self.sleeve,
            Measurement::Thigh => &mut self.thigh,
            Measurement::Inseam => &mut self.inseam,
            Measurement::Outseam => &mut self.outseam,
        };
        *slot = value;
    }

    /// Derive the figure scale factors from this set.
    ///
    /// Only height and waist participate; each absent measurement leaves
    /// its axis at 1.0.
    #[must_use]
    pub fn scale_factors(&self) -> ScaleFactors {
        let vertical = self
            .height
            .map_or(1.0, |cm| (cm / 100.0) / REFERENCE_HEIGHT_M);
        let horizontal = self
            .waist
            .map_or(1.0, |cm| (cm / 100.0) / REFERENCE_WAIST_CIRCUMFERENCE_M);
        ScaleFactors {
            horizontal,
            vertical,
        }
    }

    /// Load a measurement profile from a TOML file. Missing fields are
    /// absent measurements.
    ///
    /// # Errors
    ///
    /// Returns [`MannequinError::Io`] when the file cannot be read and
    /// [`MannequinError::OptionsParse`] on malformed TOML.
    pub fn load_profile(path: &Path) -> Result<Self, MannequinError> {
        let content =
            std::fs::read_to_string(path).map_err(MannequinError::Io)?;
        toml::from_str(&content)
            .map_err(|e| MannequinError::OptionsParse(e.to_string()))
    }

    /// Save this set as a TOML measurement profile.
    ///
    /// # Errors
    ///
    /// Returns [`MannequinError::Io`] when the file cannot be written.
    pub fn save_profile(&self, path: &Path) -> Result<(), MannequinError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MannequinError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MannequinError::Io)?;
        }
        std::fs::write(path, content).map_err(MannequinError::Io)
    }
}

/// Parse a centimeter value string. Returns `None` for anything that is
/// not a strictly positive finite number.
fn parse_cm(value: &str) -> Option<f32> {
    let parsed: f32 = value.trim().parse().ok()?;
    (parsed.is_finite() && parsed > 0.0).then_some(parsed)
}

/// Non-uniform scale derived from a [`MeasurementSet`].
///
/// The horizontal factor is applied identically to both horizontal axes so
/// the figure stays circularly symmetric about the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    /// Scale applied to the X and Z axes (waist-driven).
    pub horizontal: f32,
    /// Scale applied to the Y axis (height-driven).
    pub vertical: f32,
}

impl Default for ScaleFactors {
    fn default() -> Self {
        Self {
            horizontal: 1.0,
            vertical: 1.0,
        }
    }
}

impl ScaleFactors {
    /// The per-axis scale vector `(horizontal, vertical, horizontal)`.
    #[must_use]
    pub const fn to_vec3(self) -> Vec3 {
        Vec3::new(self.horizontal, self.vertical, self.horizontal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_height_gives_identity_vertical() {
        let set = MeasurementSet {
            waist: Some(90.0),
            ..Default::default()
        };
        assert_eq!(set.scale_factors().vertical, 1.0);
    }

    #[test]
    fn absent_waist_gives_identity_horizontal() {
        let set = MeasurementSet {
            height: Some(180.0),
            ..Default::default()
        };
        assert_eq!(set.scale_factors().horizontal, 1.0);
    }

    #[test]
    fn empty_set_is_identity() {
        assert_eq!(
            MeasurementSet::default().scale_factors(),
            ScaleFactors::default()
        );
    }

    #[test]
    fn height_ratio_against_reference() {
        let set = MeasurementSet {
            height: Some(180.0),
            ..Default::default()
        };
        let factors = set.scale_factors();
        assert!((factors.vertical - 1.8 / 1.75).abs() < 1e-6);
    }

    #[test]
    fn waist_ratio_against_reference() {
        let set = MeasurementSet {
            waist: Some(90.0),
            ..Default::default()
        };
        let factors = set.scale_factors();
        assert!((factors.horizontal - 0.9 / 0.85).abs() < 1e-6);
    }

    #[test]
    fn worked_example_from_contract() {
        let set = MeasurementSet::from_entries([
            ("height", "180"),
            ("waist", "90"),
        ]);
        let factors = set.scale_factors();
        assert!((factors.vertical - 1.028_571_4).abs() < 1e-4);
        assert!((factors.horizontal - 1.058_823_5).abs() < 1e-4);
    }

    #[test]
    fn horizontal_axes_share_one_factor() {
        let set = MeasurementSet {
            height: Some(165.0),
            waist: Some(70.0),
            ..Default::default()
        };
        let scale = set.scale_factors().to_vec3();
        assert_eq!(scale.x, scale.z);
        assert_ne!(scale.x, scale.y);
    }

    #[test]
    fn malformed_values_are_treated_as_absent() {
        let set = MeasurementSet::from_entries([
            ("height", ""),
            ("waist", "ninety"),
            ("chest", "-5"),
            ("hips", "NaN"),
            ("thigh", "inf"),
        ]);
        assert_eq!(set, MeasurementSet::default());
        assert_eq!(set.scale_factors(), ScaleFactors::default());
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let set =
            MeasurementSet::from_entries([("wingspan", "200"), ("height", "170")]);
        assert_eq!(set.height, Some(170.0));
        assert_eq!(set.get(Measurement::Weight), None);
    }

    #[test]
    fn other_measurements_do_not_influence_the_transform() {
        let set = MeasurementSet::from_entries([
            ("weight", "80"),
            ("chest", "100"),
            ("underbust", "85"),
            ("hips", "100"),
            ("sleeve", "60"),
            ("thigh", "55"),
            ("inseam", "80"),
            ("outseam", "100"),
        ]);
        assert_eq!(set.scale_factors(), ScaleFactors::default());
    }

    #[test]
    fn key_round_trips_for_all_measurements() {
        for m in Measurement::ALL {
            assert_eq!(Measurement::from_key(m.key()), Some(m));
        }
    }

    #[test]
    fn profile_round_trips_through_toml() {
        let set = MeasurementSet {
            height: Some(180.0),
            waist: Some(90.0),
            inseam: Some(81.5),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&set).unwrap();
        let parsed: MeasurementSet = toml::from_str(&toml_str).unwrap();
        assert_eq!(set, parsed);
    }

    #[test]
    fn partial_profile_toml_leaves_rest_absent() {
        let parsed: MeasurementSet = toml::from_str("height = 172.0\n").unwrap();
        assert_eq!(parsed.height, Some(172.0));
        assert_eq!(parsed.waist, None);
    }
}
