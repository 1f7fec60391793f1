//! Message types for an editing session
//!
//! Each user action maps to exactly one message. Messages are serde
//! deserializable so a recorded session can be replayed from JSON.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::AspectRatio;

// ============================================================================
// Input Action Types
// ============================================================================

/// Pointer gesture on the canvas, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerAction {
    /// Press at position
    Start(f32, f32),
    /// Drag to position
    Move(f32, f32),
    /// Release at position
    End(f32, f32),
}

/// Zoom controls for the selected piece's image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomAction {
    /// Zoom-in button (+2%)
    In,
    /// Zoom-out button (-2%)
    Out,
    /// One wheel tick; positive delta zooms out
    Wheel(f32),
    /// Arbitrary multiplicative factor
    Factor(f64),
}

// ============================================================================
// Editor Messages
// ============================================================================

/// All editor messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorMsg {
    /// Rebuild the grid, discarding every piece, image and selection
    Generate { photo_count: u32, ratio: AspectRatio },
    /// Select a piece by id, or clear the selection
    Select(Option<String>),
    /// Load a photo into the selected piece
    AssignImage(PathBuf),
    /// Move a shared vertex
    MoveVertex { id: String, x: f32, y: f32 },
    /// Insert a vertex into a triangle piece
    SplitTriangle {
        piece: String,
        x: f32,
        y: f32,
        insert_after: usize,
    },
    /// Cut a quadrilateral piece into two triangles
    CutDiagonal(String),
    /// Zoom the selected piece's image
    Zoom(ZoomAction),
    /// Rotation slider value in degrees
    SetRotation(f64),
    /// Pointer gesture
    Pointer(PointerAction),
    /// Export the canvas as PNG
    Export {
        #[serde(default)]
        path: Option<PathBuf>,
        #[serde(default)]
        density: Option<f32>,
    },
}

#[cfg(test)]
impl EditorMsg {
    pub fn generate(photo_count: u32, ratio: AspectRatio) -> Self {
        EditorMsg::Generate { photo_count, ratio }
    }

    pub fn select(piece: impl Into<String>) -> Self {
        EditorMsg::Select(Some(piece.into()))
    }

    pub fn deselect() -> Self {
        EditorMsg::Select(None)
    }

    pub fn pointer_start(x: f32, y: f32) -> Self {
        EditorMsg::Pointer(PointerAction::Start(x, y))
    }

    pub fn pointer_move(x: f32, y: f32) -> Self {
        EditorMsg::Pointer(PointerAction::Move(x, y))
    }

    pub fn pointer_end(x: f32, y: f32) -> Self {
        EditorMsg::Pointer(PointerAction::End(x, y))
    }
}

/// Parse a recorded session: a JSON array of messages
pub fn parse_script(text: &str) -> serde_json::Result<Vec<EditorMsg>> {
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script = r#"[
            { "generate": { "photo_count": 6, "ratio": "3:2" } },
            { "select": "P1" },
            { "assign_image": "photos/beach.jpg" },
            { "zoom": "in" },
            { "zoom": { "wheel": -120.0 } },
            { "set_rotation": 45.0 },
            { "pointer": { "start": [10.0, 20.0] } },
            { "move_vertex": { "id": "v-1-1", "x": 300.0, "y": 200.0 } },
            { "select": null },
            { "export": {} }
        ]"#;
        let msgs = parse_script(script).unwrap();
        assert_eq!(msgs.len(), 10);
        assert_eq!(msgs[0], EditorMsg::generate(6, AspectRatio::Landscape3x2));
        assert_eq!(msgs[1], EditorMsg::select("P1"));
        assert_eq!(msgs[2], EditorMsg::AssignImage(PathBuf::from("photos/beach.jpg")));
        assert_eq!(msgs[3], EditorMsg::Zoom(ZoomAction::In));
        assert_eq!(msgs[4], EditorMsg::Zoom(ZoomAction::Wheel(-120.0)));
        assert_eq!(msgs[6], EditorMsg::pointer_start(10.0, 20.0));
        assert_eq!(msgs[8], EditorMsg::deselect());
        assert_eq!(
            msgs[9],
            EditorMsg::Export {
                path: None,
                density: None
            }
        );
    }

    #[test]
    fn test_unknown_ratio_rejected_at_parse() {
        let script = r#"[{ "generate": { "photo_count": 6, "ratio": "21:9" } }]"#;
        assert!(parse_script(script).is_err());
    }
}
