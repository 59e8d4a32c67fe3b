use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static NON_ALNUM_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug is empty")]
    Empty,
    #[error("slug does not start with a show id: {0}")]
    NotNumeric(String),
}

/// Turn a display name into a URL-safe slug: `"Game of Thrones!"` → `"game-of-thrones"`.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    NON_ALNUM_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Extract the show id from a detail-route slug such as `1399-game-of-thrones`.
///
/// Only the run of digits at the start of the token before the first hyphen
/// matters, so `12abc-x` is show 12. The rest of the slug is not checked
/// against the show's name.
pub fn parse_show_id(slug: &str) -> Result<i64, SlugError> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(SlugError::Empty);
    }
    let token = slug.split('-').next().unwrap_or(slug);
    let digits = token
        .find(|c: char| !c.is_ascii_digit())
        .map_or(token, |end| &token[..end]);
    match digits.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(SlugError::NotNumeric(slug.to_string())),
    }
}

/// Slug used in detail routes: `<id>-<slugified name>`, or just the id when
/// the name has no sluggable characters.
pub fn show_slug(id: i64, name: &str) -> String {
    let tail = slugify(name);
    if tail.is_empty() {
        id.to_string()
    } else {
        format!("{id}-{tail}")
    }
}
