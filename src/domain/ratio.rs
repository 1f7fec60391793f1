//! Canvas aspect ratios offered by the layout controls

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Named canvas aspect ratio (width:height)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Wide16x9,
    #[serde(rename = "5:4")]
    Landscape5x4,
    #[serde(rename = "7:5")]
    Landscape7x5,
    #[serde(rename = "4:3")]
    Landscape4x3,
    #[serde(rename = "5:3")]
    Landscape5x3,
    #[default]
    #[serde(rename = "3:2")]
    Landscape3x2,
    #[serde(rename = "2:3")]
    Portrait2x3,
    #[serde(rename = "3:5")]
    Portrait3x5,
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "4:5")]
    Portrait4x5,
    #[serde(rename = "9:16")]
    Tall9x16,
}

impl AspectRatio {
    /// Every ratio, in the order the selector lists them
    pub const ALL: [AspectRatio; 12] = [
        AspectRatio::Square,
        AspectRatio::Wide16x9,
        AspectRatio::Landscape5x4,
        AspectRatio::Landscape7x5,
        AspectRatio::Landscape4x3,
        AspectRatio::Landscape5x3,
        AspectRatio::Landscape3x2,
        AspectRatio::Portrait2x3,
        AspectRatio::Portrait3x5,
        AspectRatio::Portrait3x4,
        AspectRatio::Portrait4x5,
        AspectRatio::Tall9x16,
    ];

    /// Get the `w:h` key for this ratio
    pub fn key(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Wide16x9 => "16:9",
            AspectRatio::Landscape5x4 => "5:4",
            AspectRatio::Landscape7x5 => "7:5",
            AspectRatio::Landscape4x3 => "4:3",
            AspectRatio::Landscape5x3 => "5:3",
            AspectRatio::Landscape3x2 => "3:2",
            AspectRatio::Portrait2x3 => "2:3",
            AspectRatio::Portrait3x5 => "3:5",
            AspectRatio::Portrait3x4 => "3:4",
            AspectRatio::Portrait4x5 => "4:5",
            AspectRatio::Tall9x16 => "9:16",
        }
    }

    /// Width divided by height
    pub fn value(self) -> f64 {
        let (w, h) = match self {
            AspectRatio::Square => (1.0, 1.0),
            AspectRatio::Wide16x9 => (16.0, 9.0),
            AspectRatio::Landscape5x4 => (5.0, 4.0),
            AspectRatio::Landscape7x5 => (7.0, 5.0),
            AspectRatio::Landscape4x3 => (4.0, 3.0),
            AspectRatio::Landscape5x3 => (5.0, 3.0),
            AspectRatio::Landscape3x2 => (3.0, 2.0),
            AspectRatio::Portrait2x3 => (2.0, 3.0),
            AspectRatio::Portrait3x5 => (3.0, 5.0),
            AspectRatio::Portrait3x4 => (3.0, 4.0),
            AspectRatio::Portrait4x5 => (4.0, 5.0),
            AspectRatio::Tall9x16 => (9.0, 16.0),
        };
        w / h
    }

    /// Canvas size for a fixed canvas width
    pub fn canvas_size(self, width: f32) -> (f32, f32) {
        (width, (width as f64 / self.value()) as f32)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AspectRatio {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        AspectRatio::ALL
            .into_iter()
            .find(|r| r.key() == key)
            .ok_or_else(|| CoreError::invalid(format!("unknown aspect ratio '{key}'")))
    }
}
