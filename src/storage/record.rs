use std::path::PathBuf;

use crate::{
    foundation::{
        core::{Canvas, Size},
        error::{AdError, AdResult},
        math::Fnv1a64,
    },
    plan::model::{Brief, CopySpec, Tone},
    render::pipeline::Generation,
};

/// One history entry, as stored in `history.json`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AdRecord {
    /// `img_<16 hex>`.
    pub image_id: String,
    /// Platform the ad was laid out for.
    pub ad_type: String,
    /// Owner identity (e.g. an email address), unsanitized.
    pub identity: String,
    /// Product name.
    pub product: String,
    /// Tone.
    pub tone: Tone,
    /// Discount text, if any.
    #[serde(default)]
    pub discount: Option<String>,
    /// Background prompt the image was generated from.
    pub prompt: String,
    /// Free-text hint, if any.
    #[serde(default)]
    pub prompt_extra: Option<String>,
    /// Background backend name.
    pub provider: String,
    /// Image path relative to the identity namespace.
    pub image_path: String,
    /// Final image size.
    pub image_size: Size,
    /// Copy drawn onto the image.
    pub copy: CopySpec,
    /// RFC 3339 UTC timestamp, set when the record is appended.
    #[serde(default)]
    pub created_at: String,
}

impl AdRecord {
    /// Record for a finished generation saved at `image_path`.
    pub fn from_generation(
        identity: &str,
        brief: &Brief,
        generation: &Generation,
        image_id: &str,
        image_path: &str,
        ad_type: &str,
        provider: &str,
    ) -> Self {
        Self {
            image_id: image_id.to_string(),
            ad_type: ad_type.to_string(),
            identity: identity.to_string(),
            product: brief.product.clone(),
            tone: brief.tone,
            discount: brief.discount.clone(),
            prompt: generation.background_prompt().to_string(),
            prompt_extra: brief.prompt_extra.clone(),
            provider: provider.to_string(),
            image_path: image_path.to_string(),
            image_size: generation.image.size(),
            copy: generation.copy().clone(),
            created_at: String::new(),
        }
    }
}

/// Persists finished ads and their history under a per-identity namespace.
pub trait AdStore: Send + Sync {
    /// Save `image` as PNG; returns its path relative to the identity namespace.
    fn save_image(&self, identity: &str, image_id: &str, image: &Canvas) -> AdResult<String>;

    /// Save uploaded bytes, keeping the lowercase extension of `file_name`; returns the relative
    /// path.
    fn save_upload(&self, identity: &str, file_name: &str, bytes: &[u8]) -> AdResult<String>;

    /// Absolute path for a path relative to the identity namespace.
    fn resolve(&self, identity: &str, relative: &str) -> AdResult<PathBuf>;

    /// All records in append order; empty when nothing was stored yet.
    fn load_history(&self, identity: &str) -> AdResult<Vec<AdRecord>>;

    /// Stamp `created_at` and append; returns the stored record.
    fn append_history(&self, identity: &str, record: AdRecord) -> AdResult<AdRecord>;
}

/// Fresh image id from the brief and a timestamp.
pub fn new_image_id(brief: &Brief, now: chrono::DateTime<chrono::Utc>) -> String {
    let mut h = Fnv1a64::new_default();
    h.write_str(&brief.product);
    h.write_str(brief.tone.label());
    h.write_str(brief.discount.as_deref().unwrap_or(""));
    h.write_str(brief.prompt_extra.as_deref().unwrap_or(""));
    h.write_u64(now.timestamp_nanos_opt().unwrap_or_default() as u64);
    format!("img_{:016x}", h.finish())
}

/// Directory name for an identity: lowercase, `@` → `_at_`, `.` → `_dot_`, anything else outside
/// `[a-z0-9_-]` → `_`, then `-` and 8 hex digits of an FNV-1a hash of the lowercased identity.
///
/// The readable part alone is lossy (`a.b@x` and `a_dot_b@x` agree); the hash keeps distinct
/// identities in distinct directories.
pub fn sanitize_identity(identity: &str) -> AdResult<String> {
    let trimmed = identity.trim();
    if trimmed.is_empty() {
        return Err(AdError::invalid_input("identity must be non-empty"));
    }
    let lower = trimmed.to_lowercase();
    let mut out = String::with_capacity(lower.len() + 9);
    for c in lower.chars() {
        match c {
            '@' => out.push_str("_at_"),
            '.' => out.push_str("_dot_"),
            'a'..='z' | '0'..='9' | '_' | '-' => out.push(c),
            _ => out.push('_'),
        }
    }

    let mut h = Fnv1a64::new_default();
    h.write_str(&lower);
    out.push_str(&format!("-{:08x}", h.finish() & 0xffff_ffff));
    Ok(out)
}

/// Normalize a namespace-relative path.
///
/// Uses `/` separators, drops `.` segments, and rejects absolute paths or `..`.
pub fn normalize_rel_path(source: &str) -> AdResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') || s.chars().nth(1) == Some(':') {
        return Err(AdError::invalid_input("stored paths must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(AdError::invalid_input("stored paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(AdError::invalid_input("stored path must contain a file name"));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/storage/record.rs"]
mod tests;
