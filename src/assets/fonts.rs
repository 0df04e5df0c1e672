use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    foundation::error::{AdError, AdResult},
    plan::model::FontStyle,
};

/// Where the renderer finds its two faces.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    /// Face used for `regular` blocks.
    pub regular: PathBuf,
    /// Face used for `bold` blocks.
    pub bold: PathBuf,
    /// When a configured file is absent, fall back to an installed system face instead of
    /// failing with [`AdError::ResourceMissing`].
    pub system_fallback: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            regular: PathBuf::from("assets/fonts/NotoSansKR-Medium.ttf"),
            bold: PathBuf::from("assets/fonts/NotoSansKR-VF.ttf"),
            system_fallback: false,
        }
    }
}

/// Raw font file bytes plus the face index inside the file.
#[derive(Clone)]
pub struct FontFace {
    bytes: Arc<Vec<u8>>,
    index: u32,
    source: String,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("source", &self.source)
            .field("index", &self.index)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

impl FontFace {
    /// Wrap in-memory font bytes.
    pub fn from_bytes(bytes: Vec<u8>, index: u32, source: impl Into<String>) -> AdResult<Self> {
        if bytes.is_empty() {
            return Err(AdError::invalid_input("font bytes must be non-empty"));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
            index,
            source: source.into(),
        })
    }

    /// Read a font file. A missing file is [`AdError::ResourceMissing`].
    pub fn from_path(path: &Path) -> AdResult<Self> {
        if !path.is_file() {
            return Err(AdError::resource_missing(format!(
                "font file '{}' does not exist",
                path.display()
            )));
        }
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font bytes from '{}'", path.display()))?;
        Self::from_bytes(bytes, 0, path.display().to_string())
    }

    /// Font file bytes.
    pub fn bytes(&self) -> &Arc<Vec<u8>> {
        &self.bytes
    }

    /// Face index inside a collection file.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Human-readable origin (path or system family).
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// The regular/bold face pair used by the text renderer. Read-only once loaded, so one book
/// can serve concurrent requests.
#[derive(Clone, Debug)]
pub struct FontBook {
    regular: FontFace,
    bold: FontFace,
}

const SYSTEM_FAMILIES: &[&str] = &[
    "Noto Sans KR",
    "Noto Sans CJK KR",
    "NanumGothic",
    "Apple SD Gothic Neo",
    "Malgun Gothic",
    "DejaVu Sans",
    "Liberation Sans",
];

impl FontBook {
    /// Build from two already-loaded faces.
    pub fn new(regular: FontFace, bold: FontFace) -> Self {
        Self { regular, bold }
    }

    /// Load faces as configured.
    #[tracing::instrument]
    pub fn load(cfg: &FontConfig) -> AdResult<Self> {
        match (FontFace::from_path(&cfg.regular), FontFace::from_path(&cfg.bold)) {
            (Ok(regular), Ok(bold)) => Ok(Self { regular, bold }),
            (Err(AdError::ResourceMissing(msg)), _) | (_, Err(AdError::ResourceMissing(msg)))
                if cfg.system_fallback =>
            {
                tracing::warn!(%msg, "configured font missing, using system fonts");
                Self::system()
            }
            (Err(e), _) | (_, Err(e)) => Err(e),
        }
    }

    /// Pick a regular and a bold face from the installed system fonts, preferring faces with
    /// Hangul coverage.
    pub fn system() -> AdResult<Self> {
        use usvg::fontdb::{Database, Family, Query, Stretch, Style, Weight};

        let mut db = Database::new();
        db.load_system_fonts();

        let find = |weight: Weight| {
            let mut families: Vec<Family<'_>> =
                SYSTEM_FAMILIES.iter().map(|name| Family::Name(name)).collect();
            families.push(Family::SansSerif);
            let query = Query {
                families: &families,
                weight,
                stretch: Stretch::Normal,
                style: Style::Normal,
            };
            db.query(&query).or_else(|| db.faces().next().map(|f| f.id))
        };

        let load = |weight: Weight, label: &str| -> AdResult<FontFace> {
            let id = find(weight)
                .ok_or_else(|| AdError::resource_missing("no system fonts are installed"))?;
            let (bytes, index) = db
                .with_face_data(id, |data, index| (data.to_vec(), index))
                .ok_or_else(|| AdError::resource_missing("system font data is unreadable"))?;
            let family = db
                .face(id)
                .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
                .unwrap_or_else(|| "unknown".to_string());
            FontFace::from_bytes(bytes, index, format!("system:{family}:{label}"))
        };

        Ok(Self {
            regular: load(Weight::NORMAL, "regular")?,
            bold: load(Weight::BOLD, "bold")?,
        })
    }

    /// Face for a block style.
    pub fn face(&self, style: FontStyle) -> &FontFace {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
