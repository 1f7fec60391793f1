//! Shared drawing constants and transform math for the compositor

use tiny_skia::Transform;

use crate::domain::Placement;

/// Handle geometry constants
pub mod handle {
    /// White ring drawn around vertex and split handles
    pub const OUTLINE_WIDTH: f32 = 1.0;
}

/// Pixel size of the raster surface for a canvas at a density multiplier
#[inline]
pub fn surface_size(width: f32, height: f32, density: f32) -> (u32, u32) {
    let w = (width * density).ceil().max(1.0) as u32;
    let h = (height * density).ceil().max(1.0) as u32;
    (w, h)
}

/// Map canvas coordinates to surface pixels
#[inline]
pub fn canvas_transform(density: f32) -> Transform {
    Transform::from_scale(density, density)
}

/// Map image pixels to surface pixels: center the image on its placement
/// point, then rotate and scale around that center.
pub fn image_transform(placement: &Placement, density: f32) -> Transform {
    let half_w = placement.image_width as f32 * 0.5;
    let half_h = placement.image_height as f32 * 0.5;
    canvas_transform(density)
        .pre_translate(placement.center.x, placement.center.y)
        .pre_concat(Transform::from_rotate(placement.rotation))
        .pre_scale(placement.scale, placement.scale)
        .pre_translate(-half_w, -half_h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;
    use tiny_skia::Point as SkPoint;

    fn map(t: Transform, x: f32, y: f32) -> (f32, f32) {
        let mut pts = [SkPoint::from_xy(x, y)];
        t.map_points(&mut pts);
        (pts[0].x, pts[0].y)
    }

    fn placement(rotation: f32) -> Placement {
        Placement {
            center: Point::new(100.0, 50.0),
            scale: 0.5,
            rotation,
            image_width: 40,
            image_height: 20,
        }
    }

    #[test]
    fn test_surface_size_rounds_up() {
        assert_eq!(surface_size(800.0, 533.333, 3.0), (2400, 1600));
        assert_eq!(surface_size(10.0, 10.0, 1.0), (10, 10));
    }

    #[test]
    fn test_image_center_lands_on_placement() {
        let t = image_transform(&placement(0.0), 1.0);
        assert_eq!(map(t, 20.0, 10.0), (100.0, 50.0));
        assert_eq!(map(t, 0.0, 0.0), (90.0, 45.0));
    }

    #[test]
    fn test_density_scales_output() {
        let t = image_transform(&placement(0.0), 3.0);
        assert_eq!(map(t, 20.0, 10.0), (300.0, 150.0));
    }

    #[test]
    fn test_rotation_about_center() {
        let t = image_transform(&placement(90.0), 1.0);
        let (x, y) = map(t, 40.0, 10.0);
        // Right edge midpoint swings below the center
        assert!((x - 100.0).abs() < 1e-3);
        assert!((y - 60.0).abs() < 1e-3);
    }
}
