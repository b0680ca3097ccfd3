//! Caller-owned render parameters.

/// Source of the model rotation angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationDriver {
    /// Spin continuously with the frame timestamp (seconds as radians).
    #[default]
    Time,
    /// Hold the externally supplied [`RenderParameters::rotation_degrees`].
    Parameter,
}

/// Externally mutable inputs read by the renderer every frame.
///
/// Owned by the embedding layer — CLI flags in the demo binary, UI widgets
/// in a windowed host. The renderer never writes back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParameters {
    /// RGB components of the cube tint.
    pub color: [f32; 3],
    /// Rotation angle in degrees, consumed by the parameter driver.
    pub rotation_degrees: f32,
    /// Draw indexed scenes as a line-strip wireframe instead of solid fill.
    pub wireframe: bool,
    /// Where the per-frame rotation angle comes from.
    pub rotation_driver: RotationDriver,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            color: [1.0, 0.0, 0.0],
            rotation_degrees: 0.0,
            wireframe: false,
            rotation_driver: RotationDriver::Time,
        }
    }
}

impl RenderParameters {
    /// Rotation angle in radians for the frame at `timestamp_seconds`.
    pub(crate) fn rotation_angle(&self, timestamp_seconds: f64) -> f32 {
        match self.rotation_driver {
            RotationDriver::Time => timestamp_seconds as f32,
            RotationDriver::Parameter => self.rotation_degrees.to_radians(),
        }
    }
}
