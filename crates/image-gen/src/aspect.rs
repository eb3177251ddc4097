//! Supported aspect ratios and their pixel sizes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ImageError;

/// Output shape of a generated image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 16:9, 1600x900.
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    /// 9:16, 900x1600.
    #[serde(rename = "9:16")]
    Portrait,
    /// 1:1, 1024x1024.
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 3] = [
        AspectRatio::Landscape,
        AspectRatio::Portrait,
        AspectRatio::Square,
    ];

    /// The ratio as written, e.g. "16:9".
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Square => "1:1",
        }
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            AspectRatio::Landscape => (1600, 900),
            AspectRatio::Portrait => (900, 1600),
            AspectRatio::Square => (1024, 1024),
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "16:9" => Ok(AspectRatio::Landscape),
            "9:16" => Ok(AspectRatio::Portrait),
            "1:1" => Ok(AspectRatio::Square),
            other => Err(ImageError::InvalidAspectRatio(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        assert_eq!(AspectRatio::Landscape.dimensions(), (1600, 900));
        assert_eq!(AspectRatio::Portrait.dimensions(), (900, 1600));
        assert_eq!(AspectRatio::Square.dimensions(), (1024, 1024));
    }

    #[test]
    fn test_parse() {
        for ratio in AspectRatio::ALL {
            assert_eq!(ratio.as_str().parse::<AspectRatio>().unwrap(), ratio);
        }
        assert!(matches!(
            "4:3".parse::<AspectRatio>(),
            Err(ImageError::InvalidAspectRatio(s)) if s == "4:3"
        ));
    }

    #[test]
    fn test_default_is_landscape() {
        assert_eq!(AspectRatio::default().as_str(), "16:9");
    }

    #[test]
    fn test_serde_uses_ratio_strings() {
        let json = serde_json::to_string(&AspectRatio::Portrait).unwrap();
        assert_eq!(json, "\"9:16\"");
        let parsed: AspectRatio = serde_json::from_str("\"1:1\"").unwrap();
        assert_eq!(parsed, AspectRatio::Square);
    }
}
