//! Aspect ratio presets and the pixel sizes they map to

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Output dimensions requested from a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const SQUARE: ImageSize = ImageSize::new(1024, 1024);
    pub const PORTRAIT: ImageSize = ImageSize::new(1024, 1792);
    pub const LANDSCAPE: ImageSize = ImageSize::new(1792, 1024);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Social placement presets accepted in `params.aspect_ratio`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectRatio {
    InstagramPost,
    InstagramStory,
    FacebookPost,
    TwitterPost,
    LinkedinPost,
    Pinterest,
    YoutubeThumbnail,
    WideBanner,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 8] = [
        AspectRatio::InstagramPost,
        AspectRatio::InstagramStory,
        AspectRatio::FacebookPost,
        AspectRatio::TwitterPost,
        AspectRatio::LinkedinPost,
        AspectRatio::Pinterest,
        AspectRatio::YoutubeThumbnail,
        AspectRatio::WideBanner,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            AspectRatio::InstagramPost => "instagram_post",
            AspectRatio::InstagramStory => "instagram_story",
            AspectRatio::FacebookPost => "facebook_post",
            AspectRatio::TwitterPost => "twitter_post",
            AspectRatio::LinkedinPost => "linkedin_post",
            AspectRatio::Pinterest => "pinterest",
            AspectRatio::YoutubeThumbnail => "youtube_thumbnail",
            AspectRatio::WideBanner => "wide_banner",
        }
    }

    pub fn size(&self) -> ImageSize {
        match self {
            AspectRatio::InstagramPost | AspectRatio::FacebookPost | AspectRatio::LinkedinPost => {
                ImageSize::SQUARE
            }
            AspectRatio::InstagramStory | AspectRatio::Pinterest => ImageSize::PORTRAIT,
            AspectRatio::TwitterPost | AspectRatio::YoutubeThumbnail | AspectRatio::WideBanner => {
                ImageSize::LANDSCAPE
            }
        }
    }

    /// Human label shown in the config catalog
    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::InstagramPost => "Instagram Post (1:1)",
            AspectRatio::InstagramStory => "Instagram Story (9:16)",
            AspectRatio::FacebookPost => "Facebook Post (1:1)",
            AspectRatio::TwitterPost => "Twitter Post (16:9)",
            AspectRatio::LinkedinPost => "LinkedIn Post (1:1)",
            AspectRatio::Pinterest => "Pinterest (2:3)",
            AspectRatio::YoutubeThumbnail => "YouTube Thumbnail (16:9)",
            AspectRatio::WideBanner => "Wide Banner (16:9)",
        }
    }

    /// Size for a raw key; unknown or missing keys fall back to square
    pub fn size_for(key: Option<&str>) -> ImageSize {
        key.and_then(|k| k.parse::<AspectRatio>().ok())
            .map(|ratio| ratio.size())
            .unwrap_or(ImageSize::SQUARE)
    }
}

impl FromStr for AspectRatio {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectRatio::ALL
            .iter()
            .copied()
            .find(|ratio| ratio.key() == s.trim())
            .ok_or_else(|| AppError::InvalidRequest(format!("Invalid aspect_ratio: {}", s)))
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
