//! Shared mesh vertices
//!
//! Pieces never store positions. They hold vertex ids, and every render pass
//! resolves them here, so moving one vertex reshapes every piece that
//! references it.

use std::collections::HashMap;

use super::geometry::Point;
use crate::error::{CoreError, CoreResult};

/// A shared mesh point
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    pub id: String,
    pub position: Point,
}

/// Arena of vertices keyed by stable id, kept in insertion order
#[derive(Clone, Debug, Default)]
pub struct VertexStore {
    vertices: Vec<Vertex>,
    index: HashMap<String, usize>,
    next_split: u64,
}

impl VertexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new vertex, rejecting duplicate ids
    pub fn create(&mut self, id: impl Into<String>, x: f32, y: f32) -> CoreResult<()> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(CoreError::invalid(format!("vertex {id} already exists")));
        }
        self.index.insert(id.clone(), self.vertices.len());
        self.vertices.push(Vertex {
            id,
            position: Point::new(x, y),
        });
        Ok(())
    }

    /// Overwrite a vertex position. Positions are not clamped to the canvas.
    pub fn move_to(&mut self, id: &str, x: f32, y: f32) -> CoreResult<()> {
        let slot = *self
            .index
            .get(id)
            .ok_or_else(|| CoreError::vertex_not_found(id))?;
        self.vertices[slot].position = Point::new(x, y);
        Ok(())
    }

    pub fn get(&self, id: &str) -> CoreResult<Point> {
        self.index
            .get(id)
            .map(|&slot| self.vertices[slot].position)
            .ok_or_else(|| CoreError::vertex_not_found(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All vertices in creation order
    pub fn all(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Fresh id for a vertex created by a triangle split
    pub fn next_split_id(&mut self) -> String {
        loop {
            self.next_split += 1;
            let id = format!("v-split-{}", self.next_split);
            if !self.index.contains_key(&id) {
                return id;
            }
        }
    }

    /// Closest vertex within `radius` of `p`
    pub fn nearest(&self, p: Point, radius: f32) -> Option<&Vertex> {
        let limit = radius * radius;
        self.vertices
            .iter()
            .map(|v| (v, v.position.distance_sq(p)))
            .filter(|(_, d)| *d <= limit)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(v, _)| v)
    }
}
