use std::path::{Component, Path};

use regex::Regex;
use url::Url;

use crate::error::{GeneratorError, Result};

#[inline]
pub fn capture_group_1<'a>(re: &Regex, input: &'a str) -> Option<&'a str> {
    re.captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parses an absolute manifest URL.
pub fn parse_url(input: &str) -> Result<Url> {
    Url::parse(input).map_err(|e| GeneratorError::invalid_url(input, e.to_string()))
}

/// Resolves `reference` against `base` (RFC 3986 §5). A missing reference
/// yields the base itself without its fragment.
pub fn resolve_url(base: &Url, reference: Option<&str>) -> Result<Url> {
    let reference = reference.unwrap_or("");
    base.join(reference)
        .map_err(|e| GeneratorError::invalid_url(reference, e.to_string()))
}

/// Formats a decimal the way playlist attributes expect it: integral values
/// keep one fractional digit, everything else uses the shortest exact form.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Accepts only names that stay inside the directory they are joined to:
/// one normal path component, no separator of either platform.
pub fn ensure_plain_file_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let plain = !name.contains(['/', '\\'])
        && matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
    if plain {
        Ok(())
    } else {
        Err(GeneratorError::unsafe_file_name(name))
    }
}
