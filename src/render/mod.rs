//! Canvas rendering module
//!
//! This module contains:
//! - Drawing constants and transform math
//! - Compositing of pieces, images and handles using tiny-skia
//! - PNG encoding and export file naming

pub mod export;
pub mod geometry;
pub mod image;
