//! Image URL construction for the catalog's image host.
//!
//! The catalog only hands out path fragments like `/abc.jpg`; the final URL is
//! `{IMAGE_BASE}/{size}{path}`.

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

pub const POSTER_PLACEHOLDER: &str =
    "https://images.unsplash.com/photo-1440404653325-ab127d49abc1?w=500&h=750&fit=crop";
pub const BACKDROP_PLACEHOLDER: &str =
    "https://images.unsplash.com/photo-1489599136344-0d58d8d30a0a?w=1280&h=720&fit=crop";

/// Size token requested from the image host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    W185,
    W300,
    W500,
    W1280,
    Original,
}

impl ImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::W185 => "w185",
            Self::W300 => "w300",
            Self::W500 => "w500",
            Self::W1280 => "w1280",
            Self::Original => "original",
        }
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build an image URL, falling back to `placeholder` when there is no path.
pub fn image_url(path: Option<&str>, size: ImageSize, placeholder: &str) -> String {
    match path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) if p.starts_with('/') => format!("{IMAGE_BASE}/{size}{p}"),
        Some(p) => format!("{IMAGE_BASE}/{size}/{p}"),
        None => placeholder.to_string(),
    }
}

pub fn poster_url(path: Option<&str>, size: ImageSize) -> String {
    image_url(path, size, POSTER_PLACEHOLDER)
}

pub fn backdrop_url(path: Option<&str>, size: ImageSize) -> String {
    image_url(path, size, BACKDROP_PLACEHOLDER)
}
