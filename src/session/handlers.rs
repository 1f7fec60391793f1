//! Editor message handlers
//!
//! Dispatches each `EditorMsg` to one `EditorState` operation. Rejected
//! operations are logged and dropped; only export I/O errors propagate.

use std::path::PathBuf;

use super::messages::{EditorMsg, PointerAction, ZoomAction};
use super::state::{DragState, EditorState};
use crate::assets::SourceImage;
use crate::domain::{Point, ZOOM_IN, ZOOM_OUT};
use crate::error::CoreResult;
use crate::render::export;

/// What a message did to the session
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// State changed, a gesture progressed, or a pointer moved or released
    /// with nothing held
    Applied,
    /// Message rejected; state untouched
    Ignored,
    /// Canvas written to this path
    Exported(PathBuf),
}

fn settle<T>(what: &str, result: CoreResult<T>) -> Outcome {
    match result {
        Ok(_) => Outcome::Applied,
        Err(err) => {
            log::warn!("{} ignored: {}", what, err);
            Outcome::Ignored
        }
    }
}

/// Handle an EditorMsg, modifying the session state
pub fn handle_msg(state: &mut EditorState, msg: EditorMsg) -> anyhow::Result<Outcome> {
    let outcome = match msg {
        EditorMsg::Generate { photo_count, ratio } => {
            settle("generate", state.generate(photo_count, ratio))
        }
        EditorMsg::Select(piece) => settle("select", state.select(piece.as_deref())),
        EditorMsg::AssignImage(path) => handle_assign_image(state, path),
        EditorMsg::MoveVertex { id, x, y } => settle("move vertex", state.move_vertex(&id, x, y)),
        EditorMsg::SplitTriangle {
            piece,
            x,
            y,
            insert_after,
        } => settle(
            "split triangle",
            state.split_triangle(&piece, Point::new(x, y), insert_after),
        ),
        EditorMsg::CutDiagonal(piece) => settle("cut diagonal", state.cut_diagonal(&piece)),
        EditorMsg::Zoom(action) => handle_zoom(state, action),
        EditorMsg::SetRotation(degrees) => settle("rotate", state.set_rotation(degrees)),
        EditorMsg::Pointer(action) => handle_pointer(state, action),
        EditorMsg::Export { path, density } => return handle_export(state, path, density),
    };
    Ok(outcome)
}

// ============================================================================
// Image handlers
// ============================================================================

fn handle_assign_image(state: &mut EditorState, path: PathBuf) -> Outcome {
    // The file picker is disabled without a selection
    if state.selection().is_none() {
        log::warn!("assign image ignored: no piece selected");
        return Outcome::Ignored;
    }
    let image = match SourceImage::open(&path) {
        Ok(image) => image,
        Err(err) => {
            log::warn!("assign image ignored: {:#}", err);
            return Outcome::Ignored;
        }
    };
    let handle = state.add_image(image);
    settle("assign image", state.assign_image(handle))
}

fn handle_zoom(state: &mut EditorState, action: ZoomAction) -> Outcome {
    let factor = match action {
        ZoomAction::In => ZOOM_IN,
        ZoomAction::Out => ZOOM_OUT,
        ZoomAction::Wheel(delta) if delta > 0.0 => ZOOM_OUT,
        ZoomAction::Wheel(_) => ZOOM_IN,
        ZoomAction::Factor(factor) => factor,
    };
    settle("zoom", state.adjust_scale(factor))
}

// ============================================================================
// Pointer handlers
// ============================================================================

fn handle_pointer(state: &mut EditorState, action: PointerAction) -> Outcome {
    match action {
        PointerAction::Start(x, y) => pointer_start(state, Point::new(x, y)),
        PointerAction::Move(x, y) => pointer_drag(state, Point::new(x, y)),
        PointerAction::End(x, y) => {
            let outcome = pointer_drag(state, Point::new(x, y));
            state.drag = DragState::None;
            outcome
        }
    }
}

/// Press on the canvas. With a selection active, handles take priority:
/// vertex handles, then split handles, then the selected image itself.
/// Anything else selects the piece under the pointer.
fn pointer_start(state: &mut EditorState, p: Point) -> Outcome {
    if let Some(selected) = state.selection().map(str::to_owned) {
        let vertex_radius = state.config.vertex_handle_radius;
        if let Some(id) = state.vertices().nearest(p, vertex_radius).map(|v| v.id.clone()) {
            state.drag = DragState::Vertex(id);
            return Outcome::Applied;
        }

        let split_radius = state.config.split_handle_radius;
        let split = state
            .mesh()
            .pieces()
            .iter()
            .filter(|piece| piece.is_triangle())
            .filter_map(|piece| state.mesh().split_handles(&piece.id, state.vertices()).ok())
            .flatten()
            .find(|h| h.position.distance_sq(p) <= split_radius * split_radius);
        if let Some(h) = split {
            return settle(
                "split triangle",
                state.split_triangle(&h.piece_id, h.position, h.insert_after),
            );
        }

        let on_selected_image = state
            .selected_piece()
            .is_some_and(|piece| piece.image.is_some())
            && state
                .mesh()
                .piece_at(p, state.vertices())
                .is_some_and(|piece| piece.id == selected);
        if on_selected_image {
            state.drag = DragState::Image {
                piece_id: selected,
                last: p,
            };
            return Outcome::Applied;
        }
    }

    let hit = state
        .mesh()
        .piece_at(p, state.vertices())
        .map(|piece| piece.id.clone());
    settle("select", state.select(hit.as_deref()))
}

fn pointer_drag(state: &mut EditorState, p: Point) -> Outcome {
    match state.drag.clone() {
        // Hover, or the release that ends a plain click
        DragState::None => Outcome::Applied,
        DragState::Vertex(id) => settle("move vertex", state.move_vertex(&id, p.x, p.y)),
        DragState::Image { piece_id, last } => {
            let result = state.translate_image(p.x - last.x, p.y - last.y);
            state.drag = DragState::Image { piece_id, last: p };
            settle("move image", result)
        }
    }
}

// ============================================================================
// Export handler
// ============================================================================

fn handle_export(
    state: &mut EditorState,
    path: Option<PathBuf>,
    density: Option<f32>,
) -> anyhow::Result<Outcome> {
    let density = density.unwrap_or(state.config.export_pixel_density);
    if !(density.is_finite() && density > 0.0) {
        log::warn!("export ignored: pixel density must be positive, got {}", density);
        return Ok(Outcome::Ignored);
    }
    let path = match path {
        Some(path) => path,
        None => export::get_export_path(&state.config)
            .ok_or_else(|| anyhow::anyhow!("no export location available"))?,
    };
    let img = state.export_image(density)?;
    export::save_rgba(&img, &path)?;
    log::info!(
        "Exported {}x{} collage to {}",
        img.width(),
        img.height(),
        path.display()
    );
    Ok(Outcome::Exported(path))
}
