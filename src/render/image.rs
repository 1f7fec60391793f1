//! Canvas compositing using tiny-skia
//!
//! Draw order per piece: seam-colored background, then the photo clipped to
//! the exact polygon, then the outline stroke. Interactive handles are drawn
//! last and only while a piece is selected.

use image::RgbaImage;
use tiny_skia::{
    Color, FillRule, FilterQuality, LineJoin, Mask, Paint, Path, PathBuilder, Pixmap, PixmapPaint,
    Stroke, Transform,
};

use super::geometry::{self, handle};
use crate::assets::ImageLibrary;
use crate::config::{EditorConfig, ShapeColor};
use crate::domain::{self, Piece, PieceMesh, Point, VertexStore};

/// Everything the compositor reads for one frame
pub struct Scene<'a> {
    pub vertices: &'a VertexStore,
    pub mesh: &'a PieceMesh,
    pub library: &'a ImageLibrary,
    pub selection: Option<&'a str>,
    pub config: &'a EditorConfig,
    pub width: f32,
    pub height: f32,
}

fn paint_for(color: ShapeColor) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

/// Build a closed polygon path
fn build_polygon_path(points: &[Point]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.close();
    pb.finish()
}

/// Draw a filled handle with a white ring
fn draw_handle(pixmap: &mut Pixmap, center: Point, radius: f32, color: ShapeColor, transform: Transform) {
    let Some(path) = PathBuilder::from_circle(center.x, center.y, radius) else {
        return;
    };
    pixmap.fill_path(&path, &paint_for(color), FillRule::Winding, transform, None);

    let mut ring = Paint::default();
    ring.set_color(Color::WHITE);
    ring.anti_alias = true;
    let stroke = Stroke {
        width: handle::OUTLINE_WIDTH,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &ring, &stroke, transform, None);
}

/// Draw one piece: background, clipped photo, outline
fn draw_piece(pixmap: &mut Pixmap, scene: &Scene<'_>, piece: &Piece, density: f32) {
    let polygon = match scene.mesh.polygon(&piece.id, scene.vertices) {
        Ok(polygon) => polygon,
        Err(err) => {
            log::warn!("Skipping {}: {}", piece.id, err);
            return;
        }
    };
    let Some(path) = build_polygon_path(&polygon) else {
        return;
    };
    let canvas = geometry::canvas_transform(density);
    let config = scene.config;

    pixmap.fill_path(&path, &paint_for(config.seam_color), FillRule::Winding, canvas, None);

    if let Some(source) = piece.image.and_then(|h| scene.library.get(h))
        && let Ok(bounds) = domain::piece_bounds(piece, scene.vertices)
        && let Some(placement) =
            domain::place(&bounds, &piece.transform, source.width(), source.height())
        && let Some(mut clip) = Mask::new(pixmap.width(), pixmap.height())
    {
        clip.fill_path(&path, FillRule::Winding, true, canvas);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        pixmap.draw_pixmap(
            0,
            0,
            source.pixmap.as_ref(),
            &paint,
            geometry::image_transform(&placement, density),
            Some(&clip),
        );
    }

    let selected = scene.selection == Some(piece.id.as_str());
    let (color, width) = if selected {
        (config.selection_color, config.selection_width)
    } else {
        (config.seam_color, config.seam_width)
    };
    let stroke = Stroke {
        width,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint_for(color), &stroke, canvas, None);
}

/// Draw vertex and split handles on top of every piece
fn draw_handles(pixmap: &mut Pixmap, scene: &Scene<'_>, density: f32) {
    let canvas = geometry::canvas_transform(density);
    let config = scene.config;

    for piece in scene.mesh.pieces().iter().filter(|p| p.is_triangle()) {
        match scene.mesh.split_handles(&piece.id, scene.vertices) {
            Ok(handles) => {
                for h in handles {
                    draw_handle(
                        pixmap,
                        h.position,
                        config.split_handle_radius,
                        config.split_handle_color,
                        canvas,
                    );
                }
            }
            Err(err) => log::warn!("No split handles for {}: {}", piece.id, err),
        }
    }

    for vertex in scene.vertices.all() {
        draw_handle(
            pixmap,
            vertex.position,
            config.vertex_handle_radius,
            config.vertex_handle_color,
            canvas,
        );
    }
}

/// Render the full canvas at a pixel-density multiplier
pub fn render_canvas(scene: &Scene<'_>, density: f32) -> anyhow::Result<Pixmap> {
    if !(density.is_finite() && density > 0.0) {
        anyhow::bail!("pixel density must be positive, got {density}");
    }
    let (w, h) = geometry::surface_size(scene.width, scene.height, density);
    let mut pixmap =
        Pixmap::new(w, h).ok_or_else(|| anyhow::anyhow!("cannot allocate {w}x{h} surface"))?;

    let [r, g, b, a] = scene.config.canvas_color.to_rgba_u8();
    pixmap.fill(Color::from_rgba8(r, g, b, a));

    for piece in scene.mesh.pieces() {
        draw_piece(&mut pixmap, scene, piece, density);
    }
    if scene.selection.is_some() {
        draw_handles(&mut pixmap, scene, density);
    }

    log::debug!(
        "Rendered {} pieces to {}x{} surface (selection: {:?})",
        scene.mesh.len(),
        w,
        h,
        scene.selection
    );
    Ok(pixmap)
}

/// Convert a premultiplied surface into straight-alpha RGBA
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    // Length always matches width * height * 4
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .unwrap_or_else(|| RgbaImage::new(pixmap.width(), pixmap.height()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SourceImage;
    use crate::domain::AspectRatio;

    struct Fixture {
        vertices: VertexStore,
        mesh: PieceMesh,
        library: ImageLibrary,
        config: EditorConfig,
    }

    impl Fixture {
        fn two_pieces() -> Self {
            let (vertices, mesh) = PieceMesh::generate(2, AspectRatio::Square, 100.0).unwrap();
            Self {
                vertices,
                mesh,
                library: ImageLibrary::new(),
                config: EditorConfig::default(),
            }
        }

        fn scene<'a>(&'a self, selection: Option<&'a str>) -> Scene<'a> {
            Scene {
                vertices: &self.vertices,
                mesh: &self.mesh,
                library: &self.library,
                selection,
                config: &self.config,
                width: 100.0,
                height: 100.0,
            }
        }
    }

    fn pixel(img: &RgbaImage, x: u32, y: u32) -> [u8; 4] {
        img.get_pixel(x, y).0
    }

    fn red_image() -> SourceImage {
        SourceImage::new(RgbaImage::from_pixel(10, 10, image::Rgba([255, 0, 0, 255]))).unwrap()
    }

    #[test]
    fn test_empty_pieces_show_seam_color() {
        let fx = Fixture::two_pieces();
        let img = pixmap_to_rgba(&render_canvas(&fx.scene(None), 1.0).unwrap());
        assert_eq!((img.width(), img.height()), (100, 100));
        assert_eq!(pixel(&img, 25, 50), [0xf5, 0xf5, 0xf5, 0xff]);
        assert_eq!(pixel(&img, 75, 50), [0xf5, 0xf5, 0xf5, 0xff]);
    }

    #[test]
    fn test_image_clipped_to_its_piece() {
        let mut fx = Fixture::two_pieces();
        let handle = fx.library.insert(red_image());
        fx.mesh.get_mut("P2").unwrap().image = Some(handle);

        let img = pixmap_to_rgba(&render_canvas(&fx.scene(None), 1.0).unwrap());
        assert_eq!(pixel(&img, 75, 50), [255, 0, 0, 255]);
        // Cover fit overflows into P1's area but is clipped away
        assert_eq!(pixel(&img, 30, 50), [0xf5, 0xf5, 0xf5, 0xff]);
    }

    #[test]
    fn test_reshaped_piece_clips_to_polygon() {
        let mut fx = Fixture::two_pieces();
        let handle = fx.library.insert(red_image());
        fx.mesh.get_mut("P2").unwrap().image = Some(handle);
        // Pull the shared top vertex right; P1 now covers the top-middle area
        fx.vertices.move_to("v-0-1", 90.0, 0.0).unwrap();

        let img = pixmap_to_rgba(&render_canvas(&fx.scene(None), 1.0).unwrap());
        // Inside P2's bounding box but outside its polygon
        assert_eq!(pixel(&img, 60, 10), [0xf5, 0xf5, 0xf5, 0xff]);
        assert_eq!(pixel(&img, 95, 90), [255, 0, 0, 255]);
    }

    #[test]
    fn test_selection_draws_outline_and_handles() {
        let fx = Fixture::two_pieces();
        let plain = pixmap_to_rgba(&render_canvas(&fx.scene(None), 1.0).unwrap());
        let selected = pixmap_to_rgba(&render_canvas(&fx.scene(Some("P1")), 1.0).unwrap());

        // Vertex handle at the top-left lattice corner
        assert_eq!(pixel(&selected, 2, 2), [0xff, 0x4d, 0x4f, 0xff]);
        assert_ne!(pixel(&plain, 2, 2), pixel(&selected, 2, 2));
        // Selected outline along P1's left edge, away from any handle
        let [r, g, b, _] = pixel(&selected, 0, 25);
        assert!(b > r && b > g, "expected blue outline, got {:?}", (r, g, b));
    }

    #[test]
    fn test_density_multiplies_surface() {
        let fx = Fixture::two_pieces();
        let pixmap = render_canvas(&fx.scene(None), 3.0).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (300, 300));
        assert!(render_canvas(&fx.scene(None), 0.0).is_err());
    }
}
