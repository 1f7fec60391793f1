//! Piece polygons over the shared vertex store
//!
//! This module contains:
//! - Grid generation for a photo count and aspect ratio
//! - Triangle split and diagonal cut topology edits
//! - Polygon resolution and hit testing

use super::fit::{ImageHandle, ImageTransform};
use super::geometry::{Bounds, Point, polygon_contains};
use super::ratio::AspectRatio;
use super::vertex::VertexStore;
use crate::error::{CoreError, CoreResult};

/// Smallest photo count the layout controls accept
pub const MIN_PHOTOS: u32 = 2;
/// Largest photo count the layout controls accept
pub const MAX_PHOTOS: u32 = 15;

/// A polygon region of the canvas bound to an optional image
#[derive(Clone, Debug, PartialEq)]
pub struct Piece {
    pub id: String,
    /// Vertex ids in winding order
    pub vertex_ids: Vec<String>,
    pub image: Option<ImageHandle>,
    pub transform: ImageTransform,
}

impl Piece {
    pub fn is_triangle(&self) -> bool {
        self.vertex_ids.len() == 3
    }

    pub fn uses_vertex(&self, vertex_id: &str) -> bool {
        self.vertex_ids.iter().any(|v| v == vertex_id)
    }
}

/// Clickable point that turns a triangle into a quadrilateral
#[derive(Clone, Debug, PartialEq)]
pub struct SplitHandle {
    pub piece_id: String,
    /// Midpoint of the edge from `insert_after` to the next vertex
    pub position: Point,
    pub insert_after: usize,
}

/// Grid size for a photo count: `(cols, rows)`
pub fn grid_dimensions(photo_count: u32, ratio: AspectRatio) -> (u32, u32) {
    let cols = ((photo_count as f64 * ratio.value()).sqrt().ceil() as u32).max(1);
    let rows = photo_count.div_ceil(cols);
    (cols, rows)
}

fn lattice_id(row: u32, col: u32) -> String {
    format!("v-{row}-{col}")
}

/// Ordered pieces, in z-order (later pieces draw on top)
#[derive(Clone, Debug, Default)]
pub struct PieceMesh {
    pieces: Vec<Piece>,
    next_piece: u32,
}

impl PieceMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh lattice and one quad piece per cell, row-major, until
    /// `photo_count` pieces exist. Cells left over in the last row stay empty.
    pub fn generate(
        photo_count: u32,
        ratio: AspectRatio,
        canvas_width: f32,
    ) -> CoreResult<(VertexStore, PieceMesh)> {
        if !(MIN_PHOTOS..=MAX_PHOTOS).contains(&photo_count) {
            return Err(CoreError::invalid(format!(
                "photo count must be within {MIN_PHOTOS}..={MAX_PHOTOS}, got {photo_count}"
            )));
        }
        if !canvas_width.is_finite() || canvas_width <= 0.0 {
            return Err(CoreError::invalid(format!(
                "canvas width must be positive, got {canvas_width}"
            )));
        }

        let (width, height) = ratio.canvas_size(canvas_width);
        let (cols, rows) = grid_dimensions(photo_count, ratio);

        let mut vertices = VertexStore::new();
        for r in 0..=rows {
            for c in 0..=cols {
                let x = c as f32 / cols as f32 * width;
                let y = r as f32 / rows as f32 * height;
                vertices.create(lattice_id(r, c), x, y)?;
            }
        }

        let mut mesh = PieceMesh::new();
        'cells: for r in 0..rows {
            for c in 0..cols {
                if mesh.len() as u32 >= photo_count {
                    break 'cells;
                }
                mesh.add_piece(
                    &vertices,
                    vec![
                        lattice_id(r, c),
                        lattice_id(r, c + 1),
                        lattice_id(r + 1, c + 1),
                        lattice_id(r + 1, c),
                    ],
                )?;
            }
        }

        log::debug!(
            "Generated {}x{} grid with {} vertices and {} pieces over {}x{} canvas",
            cols,
            rows,
            vertices.len(),
            mesh.len(),
            width,
            height
        );
        Ok((vertices, mesh))
    }

    /// Append a piece with the next sequential id. Every vertex id must
    /// exist in `vertices` and appear only once.
    pub fn add_piece(&mut self, vertices: &VertexStore, vertex_ids: Vec<String>) -> CoreResult<&Piece> {
        if vertex_ids.len() < 3 {
            return Err(CoreError::invalid(format!(
                "a piece needs at least 3 vertices, got {}",
                vertex_ids.len()
            )));
        }
        for (i, id) in vertex_ids.iter().enumerate() {
            if !vertices.contains(id) {
                return Err(CoreError::vertex_not_found(id.as_str()));
            }
            if vertex_ids[..i].contains(id) {
                return Err(CoreError::invalid(format!("vertex {id} repeated in piece")));
            }
        }

        self.next_piece += 1;
        self.pieces.push(Piece {
            id: format!("P{}", self.next_piece),
            vertex_ids,
            image: None,
            transform: ImageTransform::default(),
        });
        Ok(&self.pieces[self.pieces.len() - 1])
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn get(&self, piece_id: &str) -> CoreResult<&Piece> {
        self.pieces
            .iter()
            .find(|p| p.id == piece_id)
            .ok_or_else(|| CoreError::piece_not_found(piece_id))
    }

    pub fn get_mut(&mut self, piece_id: &str) -> CoreResult<&mut Piece> {
        self.pieces
            .iter_mut()
            .find(|p| p.id == piece_id)
            .ok_or_else(|| CoreError::piece_not_found(piece_id))
    }

    /// Ids of every piece referencing `vertex_id`
    pub fn pieces_using<'a>(&'a self, vertex_id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pieces
            .iter()
            .filter(move |p| p.uses_vertex(vertex_id))
            .map(|p| p.id.as_str())
    }

    /// Resolve a piece's current polygon from the vertex store
    pub fn polygon(&self, piece_id: &str, vertices: &VertexStore) -> CoreResult<Vec<Point>> {
        resolve_polygon(self.get(piece_id)?, vertices)
    }

    /// Topmost piece containing `p`
    pub fn piece_at(&self, p: Point, vertices: &VertexStore) -> Option<&Piece> {
        self.pieces.iter().rev().find(|piece| {
            resolve_polygon(piece, vertices).is_ok_and(|poly| polygon_contains(&poly, p))
        })
    }

    /// Insert a new vertex at `midpoint` after `insert_after` in a triangle
    /// piece, making it a quadrilateral. Returns the new vertex id.
    ///
    /// The new vertex is not shared with any neighbour. Splitting an edge
    /// that another piece also uses desynchronizes the two unless the caller
    /// inserts the same vertex id into the neighbour as well.
    pub fn split_triangle(
        &mut self,
        vertices: &mut VertexStore,
        piece_id: &str,
        midpoint: Point,
        insert_after: usize,
    ) -> CoreResult<String> {
        let piece = self.get_mut(piece_id)?;
        if !piece.is_triangle() {
            return Err(CoreError::unsupported(format!(
                "{piece_id} has {} vertices, only triangles can be split",
                piece.vertex_ids.len()
            )));
        }
        if insert_after >= piece.vertex_ids.len() {
            return Err(CoreError::invalid(format!(
                "insert index {insert_after} out of range for {piece_id}"
            )));
        }

        let id = vertices.next_split_id();
        vertices.create(id.clone(), midpoint.x, midpoint.y)?;
        piece.vertex_ids.insert(insert_after + 1, id.clone());
        log::debug!("Split {} after index {} with vertex {}", piece_id, insert_after, id);
        Ok(id)
    }

    /// One split handle per edge of a triangle piece; empty for other pieces
    pub fn split_handles(&self, piece_id: &str, vertices: &VertexStore) -> CoreResult<Vec<SplitHandle>> {
        let piece = self.get(piece_id)?;
        if !piece.is_triangle() {
            return Ok(Vec::new());
        }
        let poly = resolve_polygon(piece, vertices)?;
        Ok((0..poly.len())
            .map(|i| SplitHandle {
                piece_id: piece.id.clone(),
                position: poly[i].midpoint(poly[(i + 1) % poly.len()]),
                insert_after: i,
            })
            .collect())
    }

    /// Cut a quadrilateral along its first diagonal into two triangles that
    /// share the diagonal's vertices. The original piece keeps its id, image
    /// and transform; the second triangle is appended with a new id.
    pub fn cut_diagonal(&mut self, vertices: &VertexStore, piece_id: &str) -> CoreResult<String> {
        let piece = self.get_mut(piece_id)?;
        if piece.vertex_ids.len() != 4 {
            return Err(CoreError::unsupported(format!(
                "{piece_id} has {} vertices, only quadrilaterals can be cut",
                piece.vertex_ids.len()
            )));
        }
        let tail = vec![
            piece.vertex_ids[0].clone(),
            piece.vertex_ids[2].clone(),
            piece.vertex_ids[3].clone(),
        ];
        piece.vertex_ids.truncate(3);
        let new_id = self.add_piece(vertices, tail)?.id.clone();
        log::debug!("Cut {} along its diagonal, new piece {}", piece_id, new_id);
        Ok(new_id)
    }
}

/// Positions of a piece's vertices in winding order
pub fn resolve_polygon(piece: &Piece, vertices: &VertexStore) -> CoreResult<Vec<Point>> {
    piece.vertex_ids.iter().map(|id| vertices.get(id)).collect()
}

/// Bounding box of a piece's current polygon
pub fn piece_bounds(piece: &Piece, vertices: &VertexStore) -> CoreResult<Bounds> {
    let poly = resolve_polygon(piece, vertices)?;
    Bounds::from_points(&poly).ok_or_else(|| CoreError::invalid(format!("{} has no vertices", piece.id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_mesh() -> (VertexStore, PieceMesh) {
        let mut vertices = VertexStore::new();
        vertices.create("a", 0.0, 0.0).unwrap();
        vertices.create("b", 100.0, 0.0).unwrap();
        vertices.create("c", 0.0, 100.0).unwrap();
        let mut mesh = PieceMesh::new();
        mesh.add_piece(&vertices, vec!["a".into(), "b".into(), "c".into()])
            .unwrap();
        (vertices, mesh)
    }

    #[test]
    fn test_generate_six_landscape() {
        assert_eq!(grid_dimensions(6, AspectRatio::Landscape3x2), (3, 2));

        let (vertices, mesh) = PieceMesh::generate(6, AspectRatio::Landscape3x2, 800.0).unwrap();
        assert_eq!(vertices.len(), 12);
        assert_eq!(mesh.len(), 6);

        let ids: Vec<_> = mesh.pieces().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["P1", "P2", "P3", "P4", "P5", "P6"]);

        let p1 = mesh.get("P1").unwrap();
        assert_eq!(p1.vertex_ids, ["v-0-0", "v-0-1", "v-1-1", "v-1-0"]);
        let p6 = mesh.get("P6").unwrap();
        assert_eq!(p6.vertex_ids, ["v-1-2", "v-1-3", "v-2-3", "v-2-2"]);

        let corner = vertices.get("v-2-3").unwrap();
        assert_eq!(corner.x, 800.0);
        assert!((corner.y - 533.333_3).abs() < 1e-3);
    }

    #[test]
    fn test_generate_every_count_and_ratio() {
        for ratio in AspectRatio::ALL {
            for count in MIN_PHOTOS..=MAX_PHOTOS {
                let (vertices, mesh) = PieceMesh::generate(count, ratio, 800.0).unwrap();
                assert_eq!(mesh.len(), count as usize, "{ratio} x {count}");
                for piece in mesh.pieces() {
                    assert_eq!(piece.vertex_ids.len(), 4);
                    for (i, id) in piece.vertex_ids.iter().enumerate() {
                        assert!(vertices.contains(id));
                        assert!(!piece.vertex_ids[i + 1..].contains(id));
                    }
                    assert!(piece.image.is_none());
                }
            }
        }
    }

    #[test]
    fn test_partial_last_row_left_empty() {
        // 5 photos at 1:1: cols = ceil(sqrt(5)) = 3, rows = 2, one empty cell
        assert_eq!(grid_dimensions(5, AspectRatio::Square), (3, 2));
        let (vertices, mesh) = PieceMesh::generate(5, AspectRatio::Square, 600.0).unwrap();
        assert_eq!(mesh.len(), 5);
        assert_eq!(vertices.len(), 12);
        assert!(mesh.pieces().iter().all(|p| !p.uses_vertex("v-2-3")));
    }

    #[test]
    fn test_generate_rejects_out_of_range_count() {
        assert!(matches!(
            PieceMesh::generate(1, AspectRatio::Square, 800.0),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            PieceMesh::generate(16, AspectRatio::Square, 800.0),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bounds_follow_vertex_moves() {
        let (mut vertices, mesh) = PieceMesh::generate(4, AspectRatio::Square, 800.0).unwrap();
        let p1 = mesh.get("P1").unwrap();
        let before = piece_bounds(p1, &vertices).unwrap();
        assert_eq!((before.width(), before.height()), (400.0, 400.0));

        vertices.move_to("v-1-1", 500.0, 450.0).unwrap();
        let after = piece_bounds(p1, &vertices).unwrap();
        assert_eq!((after.max_x, after.max_y), (500.0, 450.0));
        assert_eq!(
            Bounds::from_points(&mesh.polygon("P1", &vertices).unwrap()),
            Some(after)
        );
    }

    #[test]
    fn test_shared_vertex_moves_all_pieces() {
        let (mut vertices, mesh) = PieceMesh::generate(6, AspectRatio::Landscape3x2, 800.0).unwrap();
        let users: Vec<_> = mesh.pieces_using("v-1-1").map(str::to_owned).collect();
        assert_eq!(users, ["P1", "P2", "P4", "P5"]);

        vertices.move_to("v-1-1", 300.0, 200.0).unwrap();
        for id in &users {
            let piece = mesh.get(id).unwrap();
            let idx = piece.vertex_ids.iter().position(|v| v == "v-1-1").unwrap();
            let poly = mesh.polygon(id, &vertices).unwrap();
            assert_eq!(poly[idx], Point::new(300.0, 200.0));
        }
    }

    #[test]
    fn test_add_piece_rejects_dangling_vertex() {
        let mut vertices = VertexStore::new();
        vertices.create("a", 0.0, 0.0).unwrap();
        vertices.create("b", 1.0, 0.0).unwrap();
        let mut mesh = PieceMesh::new();
        let err = mesh
            .add_piece(&vertices, vec!["a".into(), "b".into(), "missing".into()])
            .unwrap_err();
        assert_eq!(err, CoreError::vertex_not_found("missing"));
        assert!(mesh.pieces().is_empty());
    }

    #[test]
    fn test_split_triangle_makes_quad() {
        let (mut vertices, mut mesh) = triangle_mesh();
        let handles = mesh.split_handles("P1", &vertices).unwrap();
        assert_eq!(handles.len(), 3);
        assert_eq!(handles[0].position, Point::new(50.0, 0.0));
        assert_eq!(handles[0].insert_after, 0);

        let new_id = mesh
            .split_triangle(&mut vertices, "P1", handles[0].position, 0)
            .unwrap();
        let piece = mesh.get("P1").unwrap();
        assert_eq!(piece.vertex_ids, ["a", new_id.as_str(), "b", "c"]);
        assert_eq!(vertices.get(&new_id), Ok(Point::new(50.0, 0.0)));
        assert!(mesh.split_handles("P1", &vertices).unwrap().is_empty());
    }

    #[test]
    fn test_split_quad_rejected_without_mutation() {
        let (mut vertices, mut mesh) = PieceMesh::generate(2, AspectRatio::Square, 400.0).unwrap();
        let before_vertices = vertices.len();
        let before = mesh.get("P1").unwrap().clone();

        let err = mesh
            .split_triangle(&mut vertices, "P1", Point::new(10.0, 0.0), 0)
            .unwrap_err();
        assert!(matches!(err, CoreError::Unsupported(_)));
        assert_eq!(vertices.len(), before_vertices);
        assert_eq!(mesh.get("P1").unwrap(), &before);
    }

    #[test]
    fn test_split_rejects_bad_index_and_missing_piece() {
        let (mut vertices, mut mesh) = triangle_mesh();
        assert!(matches!(
            mesh.split_triangle(&mut vertices, "P1", Point::default(), 3),
            Err(CoreError::InvalidInput(_))
        ));
        assert_eq!(
            mesh.split_triangle(&mut vertices, "P9", Point::default(), 0),
            Err(CoreError::piece_not_found("P9"))
        );
        assert_eq!(vertices.len(), 3);
    }

    #[test]
    fn test_cut_diagonal_shares_vertices() {
        let (mut vertices, mut mesh) = PieceMesh::generate(2, AspectRatio::Square, 400.0).unwrap();
        let new_id = mesh.cut_diagonal(&vertices, "P1").unwrap();
        assert_eq!(new_id, "P3");
        assert_eq!(mesh.get("P1").unwrap().vertex_ids, ["v-0-0", "v-0-1", "v-1-1"]);
        assert_eq!(mesh.get("P3").unwrap().vertex_ids, ["v-0-0", "v-1-1", "v-1-0"]);

        // The diagonal stays seamless when one of its ends moves
        vertices.move_to("v-1-1", 150.0, 390.0).unwrap();
        let a = mesh.polygon("P1", &vertices).unwrap();
        let b = mesh.polygon("P3", &vertices).unwrap();
        assert_eq!(a[2], b[1]);

        assert!(matches!(
            mesh.cut_diagonal(&vertices, "P1"),
            Err(CoreError::Unsupported(_))
        ));
    }

    #[test]
    fn test_piece_at_prefers_topmost() {
        let (vertices, mesh) = PieceMesh::generate(4, AspectRatio::Square, 400.0).unwrap();
        assert_eq!(mesh.piece_at(Point::new(50.0, 50.0), &vertices).map(|p| p.id.as_str()), Some("P1"));
        assert_eq!(mesh.piece_at(Point::new(350.0, 350.0), &vertices).map(|p| p.id.as_str()), Some("P4"));
        assert!(mesh.piece_at(Point::new(-5.0, 50.0), &vertices).is_none());
    }

    #[test]
    fn test_piece_bounds_follow_vertices() {
        let (mut vertices, mesh) = PieceMesh::generate(2, AspectRatio::Square, 400.0).unwrap();
        vertices.move_to("v-0-0", -20.0, -10.0).unwrap();
        let b = piece_bounds(mesh.get("P1").unwrap(), &vertices).unwrap();
        assert_eq!(b.min_x, -20.0);
        assert_eq!(b.min_y, -10.0);
        assert_eq!(b.max_x, 200.0);
    }
}
