//! Template filling: literal placeholder substitution into SVG documents.
//!
//! ## Substitution contract
//!
//! Replacement is plain text, not a template language. For every
//! `(token, value)` pair in a [`Replacements`], in insertion order, every
//! occurrence of `token` in the document is replaced by `value`. Values are
//! not escaped, and a value containing a token handled later in the order
//! is itself substituted by that later pair. Tokens that never occur are
//! silently ignored, so a document without placeholders passes through
//! unchanged.

use crate::config::GeneratorConfig;
use crate::error::CardgenError;
use crate::pipeline::normalize::CardRecord;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Characters left as-is when URL-encoding an artwork file name: the
/// unreserved set plus `/`.
const IMAGE_NAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Ordered token → value pairs.
///
/// Order matters: see the module-level substitution contract. Inserting an
/// existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replacements(Vec<(String, String)>);

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Turn field names into the tokens written in the templates:
    /// `name` → `{open}name{close}`.
    pub fn wrapped(&self, open: &str, close: &str) -> Self {
        self.iter()
            .map(|(k, v)| (format!("{open}{k}{close}"), v.to_string()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Replacements {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (k, v) in iter {
            out.insert(k, v);
        }
        out
    }
}

/// Substitute every token in `content`; see the module-level contract.
pub fn apply_replacements(content: &str, replacements: &Replacements) -> String {
    let mut out = content.to_string();
    for (token, value) in replacements.iter() {
        if token.is_empty() {
            continue;
        }
        out = out.replace(token, value);
    }
    out
}

/// Absolute path of an artwork file, with the file name URL-encoded the way
/// an SVG `href` stores it.
pub fn resolve_image_path(pictures_dir: &Path, file_name: &str) -> Result<PathBuf, CardgenError> {
    let encoded = utf8_percent_encode(file_name, IMAGE_NAME_ENCODE_SET).to_string();
    let relative = pictures_dir.join(&encoded);
    let absolute = std::path::absolute(&relative).map_err(|e| CardgenError::PathResolution {
        path: relative.clone(),
        source: e,
    })?;
    if pictures_dir.join(file_name).exists() {
        info!("Image {} exists=true", absolute.display());
    } else {
        warn!("Image {} exists=false", absolute.display());
    }
    Ok(absolute)
}

/// Read `source`, substitute `replacements` and write the result to
/// `destination`.
pub fn fill_template(
    source: &Path,
    destination: &Path,
    replacements: &Replacements,
) -> Result<(), CardgenError> {
    if !source.exists() {
        return Err(CardgenError::TemplateNotFound {
            path: source.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(source).map_err(|e| CardgenError::TemplateRead {
        path: source.to_path_buf(),
        source: e,
    })?;

    let filled = apply_replacements(&content, replacements);

    std::fs::write(destination, filled).map_err(|e| CardgenError::OutputWriteFailed {
        path: destination.to_path_buf(),
        source: e,
    })?;
    debug!("{} → {}", source.display(), destination.display());
    Ok(())
}

/// Fill the template selected by `card` and write `{svg_dir}/{name}.svg`.
///
/// The card's fields are wrapped in the configured token delimiters, and the
/// configured image placeholder is bound to the card's artwork. Returns the
/// written path. The SVG directory must already exist.
pub fn make_card(config: &GeneratorConfig, card: &CardRecord) -> Result<PathBuf, CardgenError> {
    let name = card.name();
    let outfile = config.svg_dir().join(format!("{name}.svg"));

    let mut replacements = card.fields.wrapped(&config.token_open, &config.token_close);
    let image = resolve_image_path(&config.pictures_dir, &config.image_file_name(name))?;
    replacements.insert(
        config.image_placeholder.clone(),
        image.to_string_lossy().into_owned(),
    );

    fill_template(&config.template_path(&card.template), &outfile, &replacements)?;
    Ok(outfile)
}
