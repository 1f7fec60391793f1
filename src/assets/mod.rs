//! Source images behind revocable handles
//!
//! Pieces reference photos by `ImageHandle`. The library owns the decoded
//! pixels; the session releases a handle when its piece's image is replaced
//! or the layout is regenerated, so repeated uploads do not accumulate.

pub mod image;

use std::collections::BTreeMap;

pub use self::image::SourceImage;
use crate::domain::ImageHandle;

#[derive(Debug, Default)]
pub struct ImageLibrary {
    images: BTreeMap<ImageHandle, SourceImage>,
    next: u64,
}

impl ImageLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an image and hand out a fresh handle
    pub fn insert(&mut self, image: SourceImage) -> ImageHandle {
        self.next += 1;
        let handle = ImageHandle(self.next);
        self.images.insert(handle, image);
        handle
    }

    pub fn get(&self, handle: ImageHandle) -> Option<&SourceImage> {
        self.images.get(&handle)
    }

    /// Drop the image behind a handle. Releasing twice is harmless.
    pub fn release(&mut self, handle: ImageHandle) -> bool {
        let released = self.images.remove(&handle).is_some();
        if released {
            log::debug!("Released image handle {:?}", handle);
        }
        released
    }

    /// Drop every image
    pub fn clear(&mut self) {
        if !self.is_empty() {
            log::debug!("Releasing {} image handles", self.len());
        }
        self.images.clear();
    }

    /// Number of live handles
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::RgbaImage;

    fn pixel_image() -> SourceImage {
        SourceImage::new(RgbaImage::new(1, 1)).unwrap()
    }

    #[test]
    fn test_handles_are_unique() {
        let mut lib = ImageLibrary::new();
        let a = lib.insert(pixel_image());
        let b = lib.insert(pixel_image());
        assert_ne!(a, b);
        assert_eq!(lib.len(), 2);
    }

    #[test]
    fn test_release_frees_once() {
        let mut lib = ImageLibrary::new();
        let a = lib.insert(pixel_image());
        assert!(lib.release(a));
        assert!(!lib.release(a));
        assert!(lib.get(a).is_none());
        assert!(lib.is_empty());
    }

    #[test]
    fn test_handles_not_reused_after_clear() {
        let mut lib = ImageLibrary::new();
        let a = lib.insert(pixel_image());
        lib.clear();
        let b = lib.insert(pixel_image());
        assert_ne!(a, b);
    }
}
