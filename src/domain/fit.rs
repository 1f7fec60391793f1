//! Per-piece image placement: cover fit, zoom, rotation and free translate
//!
//! The transform is independent of mesh topology. Each render computes the
//! final placement from the piece's current bounding box, so reshaping a
//! piece refits its image automatically.

use serde::{Deserialize, Serialize};

use super::geometry::{Bounds, Point};
use crate::error::{CoreError, CoreResult};

/// Multiplicative step applied by one zoom-in press or wheel tick
pub const ZOOM_IN: f64 = 1.02;
/// Multiplicative step applied by one zoom-out press or wheel tick
pub const ZOOM_OUT: f64 = 0.98;

/// Revocable reference to a decoded source image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageHandle(pub u64);

/// User adjustments on top of the default cover fit
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageTransform {
    /// Cumulative zoom multiplier applied to the cover scale
    pub zoom: f64,
    /// Absolute rotation in degrees, within [0, 360]
    pub rotation: f64,
    /// Manual offset of the image center from the box center
    pub offset: Point,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            rotation: 0.0,
            offset: Point::default(),
        }
    }
}

impl ImageTransform {
    /// Multiply the current zoom. Compounds over repeated calls.
    pub fn adjust_scale(&mut self, factor: f64) -> CoreResult<f64> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(CoreError::invalid(format!(
                "zoom factor must be finite and positive, got {factor}"
            )));
        }
        self.zoom *= factor;
        Ok(self.zoom)
    }

    /// Set the absolute rotation, wrapping values outside [0, 360]
    pub fn set_rotation(&mut self, degrees: f64) -> CoreResult<f64> {
        let wrapped = normalize_rotation(degrees)
            .ok_or_else(|| CoreError::invalid(format!("rotation must be finite, got {degrees}")))?;
        self.rotation = wrapped;
        Ok(wrapped)
    }

    /// Shift the image center by a drag delta
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.offset = self.offset.translate(dx, dy);
    }

    /// Recenter the image on its piece
    pub fn reset_offset(&mut self) {
        self.offset = Point::default();
    }
}

/// Wrap a rotation into [0, 360]. Values already in range are kept as is,
/// so both 0 and 360 are representable. Non-finite input yields `None`.
pub fn normalize_rotation(degrees: f64) -> Option<f64> {
    if !degrees.is_finite() {
        return None;
    }
    if (0.0..=360.0).contains(&degrees) {
        Some(degrees)
    } else {
        Some(degrees.rem_euclid(360.0))
    }
}

/// Uniform scale at which the image fully covers the box
pub fn cover_scale(bounds: &Bounds, image_width: u32, image_height: u32) -> Option<f32> {
    if image_width == 0 || image_height == 0 {
        return None;
    }
    let sx = bounds.width() / image_width as f32;
    let sy = bounds.height() / image_height as f32;
    Some(sx.max(sy))
}

/// Final placement of an image inside a piece
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Where the image center lands in canvas coordinates
    pub center: Point,
    /// Uniform scale from image pixels to canvas units
    pub scale: f32,
    /// Rotation in degrees around the image center
    pub rotation: f32,
    pub image_width: u32,
    pub image_height: u32,
}

/// Resolve the placement of an image of the given size in `bounds`
pub fn place(
    bounds: &Bounds,
    transform: &ImageTransform,
    image_width: u32,
    image_height: u32,
) -> Option<Placement> {
    let base = cover_scale(bounds, image_width, image_height)?;
    let scale = (base as f64 * transform.zoom) as f32;
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    let center = bounds
        .center()
        .translate(transform.offset.x, transform.offset.y);
    Some(Placement {
        center,
        scale,
        rotation: transform.rotation as f32,
        image_width,
        image_height,
    })
}
