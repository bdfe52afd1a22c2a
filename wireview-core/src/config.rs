//! Viewer settings.
//!
//! Every field has a default, so a settings file only needs the values it
//! changes.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::projection::{ProjectionMode, ProjectionPlane};
use crate::scene::RotationMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Distance of the eye from the origin after a camera reset.
    pub camera_distance: f64,
    /// Radius of the virtual trackball, in centered pointer units.
    pub trackball_radius: f64,
    /// Vertical pointer travel per radian of 2D rotation.
    pub roll_sensitivity: f64,
    /// Length of the drawn world axes.
    pub axis_length: f64,
    pub projection_plane: ProjectionPlane,
    /// Projection mode at startup.
    pub projection: ProjectionMode,
    /// Rotation mode at startup.
    pub rotation: RotationMode,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            camera_distance: 500.0,
            trackball_radius: 140.0,
            roll_sensitivity: 60.0,
            axis_length: 100.0,
            projection_plane: ProjectionPlane::EyeDistance,
            projection: ProjectionMode::Orthographic,
            rotation: RotationMode::Rotate3d,
        }
    }
}

impl ViewSettings {
    /// Check that every length and rate is a positive finite number.
    ///
    /// Gestures divide by the trackball radius and the roll sensitivity, so
    /// settings read from a file go through here first.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let mut fields = vec![
            ("camera_distance", self.camera_distance),
            ("trackball_radius", self.trackball_radius),
            ("roll_sensitivity", self.roll_sensitivity),
            ("axis_length", self.axis_length),
        ];
        if let ProjectionPlane::Fixed(distance) = self.projection_plane {
            fields.push(("projection_plane", distance));
        }
        match fields.into_iter().find(|(_, value)| !value.is_finite() || *value <= 0.0) {
            Some((field, value)) => Err(SettingsError::NotPositive { field, value }),
            None => Ok(()),
        }
    }
}
