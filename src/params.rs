//! Maps the caller's free-form size and style selectors to generation
//! parameters.

/// Output dimensions the service knows how to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Landscape,
    Portrait,
    Square,
    Default,
}

impl ImageSize {
    /// Case-insensitive substring match; the first rule that matches wins, so
    /// "landscape square" resolves to `Landscape`.
    pub fn from_selector(selector: Option<&str>) -> Self {
        let Some(value) = selector.filter(|value| !value.is_empty()) else {
            return ImageSize::Default;
        };
        let value = value.to_lowercase();
        if value.contains("landscape") || value.contains("768x512") {
            ImageSize::Landscape
        } else if value.contains("portrait") || value.contains("512x768") {
            ImageSize::Portrait
        } else if value.contains("square") || value.contains("512x512") {
            ImageSize::Square
        } else {
            ImageSize::Default
        }
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            ImageSize::Landscape => (768, 512),
            ImageSize::Portrait => (512, 768),
            ImageSize::Square => (512, 512),
            ImageSize::Default => (1024, 1024),
        }
    }
}

/// Art styles with a fixed prompt suffix. Anything else is `Unstyled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtStyle {
    Photorealistic,
    DigitalArt,
    OilPainting,
    Watercolor,
    Anime,
    Cyberpunk,
    Fantasy,
    Unstyled,
}

impl ArtStyle {
    /// Exact, case-insensitive match against the known style names.
    pub fn from_selector(selector: Option<&str>) -> Self {
        let Some(value) = selector else {
            return ArtStyle::Unstyled;
        };
        match value.to_lowercase().as_str() {
            "photorealistic" => ArtStyle::Photorealistic,
            "digital art" => ArtStyle::DigitalArt,
            "oil painting" => ArtStyle::OilPainting,
            "watercolor" => ArtStyle::Watercolor,
            "anime" => ArtStyle::Anime,
            "cyberpunk" => ArtStyle::Cyberpunk,
            "fantasy" => ArtStyle::Fantasy,
            _ => ArtStyle::Unstyled,
        }
    }

    pub fn suffix(self) -> Option<&'static str> {
        match self {
            ArtStyle::Photorealistic => {
                Some("Rendered as an ultra realistic photograph with natural lighting.")
            }
            ArtStyle::DigitalArt => Some("Illustrated in high quality digital art style."),
            ArtStyle::OilPainting => Some("Painted in detailed oil painting style on canvas."),
            ArtStyle::Watercolor => Some("Painted in soft watercolor illustration style."),
            ArtStyle::Anime => Some("Drawn in clean, colorful anime illustration style."),
            ArtStyle::Cyberpunk => Some("With neon lights and futuristic cyberpunk aesthetic."),
            ArtStyle::Fantasy => Some("In a magical fantasy art style."),
            ArtStyle::Unstyled => None,
        }
    }

    pub fn apply(self, prompt: &str) -> String {
        match self.suffix() {
            Some(suffix) => format!("{prompt} {suffix}"),
            None => prompt.to_string(),
        }
    }
}

pub fn map_size(selector: Option<&str>) -> (u32, u32) {
    ImageSize::from_selector(selector).dimensions()
}

pub fn apply_style(prompt: &str, selector: Option<&str>) -> String {
    ArtStyle::from_selector(selector).apply(prompt)
}
