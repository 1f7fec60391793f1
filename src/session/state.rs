//! Editing session state
//!
//! `EditorState` owns the vertex store, piece mesh, image library and the
//! single selection. Every mutation goes through one of its methods; core
//! failures come back as `CoreError` and leave the state untouched.

use image::RgbaImage;
use tiny_skia::Pixmap;

use crate::assets::{ImageLibrary, SourceImage};
use crate::config::EditorConfig;
use crate::domain::{AspectRatio, ImageHandle, Piece, PieceMesh, Point, VertexStore};
use crate::error::{CoreError, CoreResult};
use crate::render::image::{Scene, pixmap_to_rgba, render_canvas};

/// Pointer drag in progress
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    None,
    /// Dragging a shared vertex
    Vertex(String),
    /// Dragging the selected piece's image; last pointer position
    Image { piece_id: String, last: Point },
}

#[derive(Debug)]
pub struct EditorState {
    pub config: EditorConfig,
    vertices: VertexStore,
    mesh: PieceMesh,
    library: ImageLibrary,
    selection: Option<String>,
    /// Rotation slider value, mirrors the selected piece
    rotation: f64,
    pub drag: DragState,
    photo_count: u32,
    ratio: AspectRatio,
    width: f32,
    height: f32,
}

impl EditorState {
    /// Create a session with an initial grid
    pub fn new(config: EditorConfig, photo_count: u32, ratio: AspectRatio) -> CoreResult<Self> {
        let mut state = Self {
            config,
            vertices: VertexStore::new(),
            mesh: PieceMesh::new(),
            library: ImageLibrary::new(),
            selection: None,
            rotation: 0.0,
            drag: DragState::None,
            photo_count,
            ratio,
            width: 0.0,
            height: 0.0,
        };
        state.generate(photo_count, ratio)?;
        Ok(state)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn vertices(&self) -> &VertexStore {
        &self.vertices
    }

    pub fn mesh(&self) -> &PieceMesh {
        &self.mesh
    }

    pub fn library(&self) -> &ImageLibrary {
        &self.library
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn selected_piece(&self) -> Option<&Piece> {
        self.selection.as_deref().and_then(|id| self.mesh.get(id).ok())
    }

    /// Current rotation slider value
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn photo_count(&self) -> u32 {
        self.photo_count
    }

    pub fn ratio(&self) -> AspectRatio {
        self.ratio
    }

    pub fn canvas_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn require_selection(&self, action: &str) -> CoreResult<String> {
        self.selection
            .clone()
            .ok_or_else(|| CoreError::unsupported(format!("{action} needs a selected piece")))
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Replace the whole layout. Images, selection and rotation are reset.
    pub fn generate(&mut self, photo_count: u32, ratio: AspectRatio) -> CoreResult<()> {
        let (vertices, mesh) = PieceMesh::generate(photo_count, ratio, self.config.canvas_width)?;
        let (width, height) = ratio.canvas_size(self.config.canvas_width);

        self.library.clear();
        self.vertices = vertices;
        self.mesh = mesh;
        self.selection = None;
        self.rotation = 0.0;
        self.drag = DragState::None;
        self.photo_count = photo_count;
        self.ratio = ratio;
        self.width = width;
        self.height = height;

        log::info!(
            "Generated layout: {} photos at {} ({}x{})",
            photo_count,
            ratio,
            width,
            height
        );
        Ok(())
    }

    /// Select a piece or clear the selection
    pub fn select(&mut self, piece_id: Option<&str>) -> CoreResult<()> {
        match piece_id {
            Some(id) => {
                let rotation = self.mesh.get(id)?.transform.rotation;
                self.selection = Some(id.to_string());
                self.rotation = rotation;
            }
            None => {
                self.selection = None;
            }
        }
        self.drag = DragState::None;
        log::debug!("Selection: {:?}", self.selection);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Move a shared vertex. Images of every piece using it are recentered.
    pub fn move_vertex(&mut self, vertex_id: &str, x: f32, y: f32) -> CoreResult<()> {
        self.vertices.move_to(vertex_id, x, y)?;
        let users: Vec<String> = self.mesh.pieces_using(vertex_id).map(str::to_owned).collect();
        for id in users {
            self.mesh.get_mut(&id)?.transform.reset_offset();
        }
        Ok(())
    }

    /// Turn a triangle piece into a quadrilateral
    pub fn split_triangle(
        &mut self,
        piece_id: &str,
        midpoint: Point,
        insert_after: usize,
    ) -> CoreResult<String> {
        let id = self
            .mesh
            .split_triangle(&mut self.vertices, piece_id, midpoint, insert_after)?;
        self.mesh.get_mut(piece_id)?.transform.reset_offset();
        Ok(id)
    }

    /// Cut a quadrilateral piece into two triangles
    pub fn cut_diagonal(&mut self, piece_id: &str) -> CoreResult<String> {
        let new_id = self.mesh.cut_diagonal(&self.vertices, piece_id)?;
        self.mesh.get_mut(piece_id)?.transform.reset_offset();
        Ok(new_id)
    }

    // ------------------------------------------------------------------
    // Images
    // ------------------------------------------------------------------

    /// Hand an image to the library and return its handle
    pub fn add_image(&mut self, image: SourceImage) -> ImageHandle {
        self.library.insert(image)
    }

    /// Put an image into the selected piece, releasing whatever it held.
    /// On failure the new handle is released too.
    pub fn assign_image(&mut self, handle: ImageHandle) -> CoreResult<()> {
        let result = self.require_selection("assigning an image").and_then(|id| {
            let piece = self.mesh.get_mut(&id)?;
            let previous = piece.image.replace(handle);
            piece.transform = Default::default();
            Ok((id, previous))
        });
        match result {
            Ok((id, previous)) => {
                if let Some(previous) = previous
                    && previous != handle
                {
                    self.library.release(previous);
                }
                self.rotation = 0.0;
                log::debug!("Assigned image {:?} to {}", handle, id);
                Ok(())
            }
            Err(err) => {
                self.library.release(handle);
                Err(err)
            }
        }
    }

    /// Multiply the selected image's zoom
    pub fn adjust_scale(&mut self, factor: f64) -> CoreResult<f64> {
        let id = self.require_selection("zooming")?;
        self.mesh.get_mut(&id)?.transform.adjust_scale(factor)
    }

    /// Set the selected image's rotation
    pub fn set_rotation(&mut self, degrees: f64) -> CoreResult<f64> {
        let id = self.require_selection("rotating")?;
        let applied = self.mesh.get_mut(&id)?.transform.set_rotation(degrees)?;
        self.rotation = applied;
        Ok(applied)
    }

    /// Shift the selected image's center
    pub fn translate_image(&mut self, dx: f32, dy: f32) -> CoreResult<()> {
        let id = self.require_selection("moving an image")?;
        self.mesh.get_mut(&id)?.transform.translate(dx, dy);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    fn scene(&self) -> Scene<'_> {
        Scene {
            vertices: &self.vertices,
            mesh: &self.mesh,
            library: &self.library,
            selection: self.selection.as_deref(),
            config: &self.config,
            width: self.width,
            height: self.height,
        }
    }

    /// Render the interactive view, including selection decorations
    pub fn render(&self, density: f32) -> anyhow::Result<Pixmap> {
        render_canvas(&self.scene(), density)
    }

    /// Clear the selection, then render the final composite. Rendering runs
    /// after the state change, so no handle or highlight can leak in.
    pub fn export_image(&mut self, density: f32) -> anyhow::Result<RgbaImage> {
        self.selection = None;
        self.drag = DragState::None;
        let pixmap = render_canvas(&self.scene(), density)?;
        Ok(pixmap_to_rgba(&pixmap))
    }
}
