//! Source image type for photos assigned to pieces

use std::path::Path;

use anyhow::Context;
use image::RgbaImage;
use tiny_skia::{ColorU8, IntSize, Pixmap};

/// File extensions accepted by the image picker
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// A decoded photo, stored only as the premultiplied pixmap the compositor
/// samples from
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub pixmap: Pixmap,
}

impl SourceImage {
    /// Create a new SourceImage from decoded RGBA pixels. The RGBA buffer is
    /// consumed.
    pub fn new(rgba: RgbaImage) -> anyhow::Result<Self> {
        let size = IntSize::from_wh(rgba.width(), rgba.height())
            .ok_or_else(|| anyhow::anyhow!("image has zero size"))?;
        let pixels: Vec<u8> = rgba
            .pixels()
            .flat_map(|p| {
                let c = ColorU8::from_rgba(p[0], p[1], p[2], p[3]).premultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        let pixmap = Pixmap::from_vec(pixels, size)
            .ok_or_else(|| anyhow::anyhow!("could not build pixmap"))?;
        log::debug!(
            "SourceImage decoded: {}x{} pixels",
            rgba.width(),
            rgba.height()
        );
        Ok(Self { pixmap })
    }

    /// Decode an image file, rejecting unsupported file types
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if !is_supported(path) {
            anyhow::bail!(
                "unsupported image type {} (expected one of {})",
                path.display(),
                SUPPORTED_EXTENSIONS.join(", ")
            );
        }
        let decoded = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
        Self::new(decoded.into_rgba8())
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }
}

/// Check the file extension against the supported set (case-insensitive)
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}
