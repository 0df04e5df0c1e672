use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::decode::save_png,
    foundation::{
        core::Canvas,
        error::{AdError, AdResult},
        math::Fnv1a64,
    },
    storage::record::{AdRecord, AdStore, normalize_rel_path, sanitize_identity},
};

const HISTORY_FILE: &str = "history.json";

/// Stores everything under `<root>/users/<sanitized identity>-<hash>/`.
#[derive(Clone, Debug)]
pub struct LocalFsStore {
    root: PathBuf,
}

impl LocalFsStore {
    /// Store rooted at `root`; directories are created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn user_root(&self, identity: &str) -> AdResult<PathBuf> {
        Ok(self.root.join("users").join(sanitize_identity(identity)?))
    }

    fn write_file(&self, identity: &str, relative: &str, bytes: &[u8]) -> AdResult<()> {
        let path = self.resolve(identity, relative)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create store dir '{}'", parent.display()))?;
        }
        std::fs::write(&path, bytes).with_context(|| format!("write '{}'", path.display()))?;
        Ok(())
    }
}

fn upload_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

impl AdStore for LocalFsStore {
    #[tracing::instrument(skip(self, image), fields(size = %image.size()))]
    fn save_image(&self, identity: &str, image_id: &str, image: &Canvas) -> AdResult<String> {
        let relative = normalize_rel_path(&format!("images/{image_id}.png"))?;
        let path = self.resolve(identity, &relative)?;
        save_png(image, &path)?;
        tracing::debug!(path = %path.display(), "image saved");
        Ok(relative)
    }

    fn save_upload(&self, identity: &str, file_name: &str, bytes: &[u8]) -> AdResult<String> {
        if bytes.is_empty() {
            return Err(AdError::invalid_input("upload is empty"));
        }
        let mut h = Fnv1a64::new_default();
        h.write_bytes(bytes);
        let relative = format!("uploads/{:016x}{}", h.finish(), upload_extension(file_name));
        self.write_file(identity, &relative, bytes)?;
        Ok(relative)
    }

    fn resolve(&self, identity: &str, relative: &str) -> AdResult<PathBuf> {
        let relative = normalize_rel_path(relative)?;
        Ok(self.user_root(identity)?.join(relative))
    }

    fn load_history(&self, identity: &str) -> AdResult<Vec<AdRecord>> {
        let path = self.resolve(identity, HISTORY_FILE)?;
        if !path.is_file() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("read history '{}'", path.display()))?;
        Ok(serde_json::from_str(&text)?)
    }

    #[tracing::instrument(skip(self, record), fields(image_id = %record.image_id))]
    fn append_history(&self, identity: &str, mut record: AdRecord) -> AdResult<AdRecord> {
        let mut history = self.load_history(identity)?;
        record.created_at = chrono::Utc::now().to_rfc3339();
        history.push(record.clone());

        let json = serde_json::to_string_pretty(&history)?;
        self.write_file(identity, HISTORY_FILE, json.as_bytes())?;
        tracing::debug!(entries = history.len(), "history appended");
        Ok(record)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storage/local_fs.rs"]
mod tests;
