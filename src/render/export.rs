//! PNG encoding and export destinations

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Local};
use image::RgbaImage;

use crate::config::{EditorConfig, SaveLocation};

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

/// Write an image to a PNG file, creating parent directories
pub fn save_rgba(img: &RgbaImage, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_png(io::BufWriter::new(file), img).with_context(|| format!("encoding {}", path.display()))
}

/// File name for an export. The name comes from the configured template;
/// a timestamp prefix is added only when enabled.
pub fn export_file_name(config: &EditorConfig, now: DateTime<Local>) -> String {
    if config.export_timestamped {
        format!(
            "{}_{}",
            now.format("%Y-%m-%d_%H-%M-%S"),
            config.export_file_name
        )
    } else {
        config.export_file_name.clone()
    }
}

/// Default export path in the configured save location
pub fn get_export_path(config: &EditorConfig) -> Option<PathBuf> {
    let mut path = match config.save_location {
        SaveLocation::Pictures => {
            dirs::picture_dir().or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
        }
        SaveLocation::Documents => {
            dirs::document_dir().or_else(|| dirs::home_dir().map(|h| h.join("Documents")))
        }
    }?;
    path.push(export_file_name(config, Local::now()));
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_name_by_default() {
        let config = EditorConfig::default();
        assert_eq!(export_file_name(&config, Local::now()), "seamweave_collage.png");
    }

    #[test]
    fn test_timestamped_name() {
        let config = EditorConfig {
            export_timestamped: true,
            ..EditorConfig::default()
        };
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            export_file_name(&config, now),
            "2024-03-09_14-05-07_seamweave_collage.png"
        );
    }

    #[test]
    fn test_png_round_trip() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgba([10, 20, 30, 255]));

        let mut buffer = Vec::new();
        write_png(&mut buffer, &img).unwrap();
        assert_eq!(&buffer[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&buffer).unwrap().into_rgba8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("collage.png");
        save_rgba(&RgbaImage::new(4, 4), &path).unwrap();
        assert!(path.exists());
    }
}
