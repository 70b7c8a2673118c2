//! Icon resolution.
//!
//! A detail record resolves to an [`IconCode`]: the anycast provider when the
//! record is anycast and its operator is recognised, otherwise the lower-cased
//! country code, otherwise `unknown`. [`IconResolver`] turns codes into asset
//! paths and falls back when an asset does not exist.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::anycast::provider_for;
use crate::config::{DEFAULT_ICON, FLAGS_PNG_DIR, FLAGS_SVG_DIR, UNKNOWN_FLAG};
use crate::lookup::IpDetails;

/// What a record's icon shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum IconCode {
    /// An anycast provider logo
    Provider(&'static str),
    /// A lower-cased country code
    Country(String),
    /// Nothing better is known
    Unknown,
}

impl IconCode {
    /// The file stem of the asset for this code.
    pub fn as_str(&self) -> &str {
        match self {
            IconCode::Provider(p) => p,
            IconCode::Country(c) => c,
            IconCode::Unknown => UNKNOWN_FLAG,
        }
    }
}

impl fmt::Display for IconCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves the icon code of a record.
///
/// `None` details (no token, failed lookup) also resolve to `Unknown`.
pub fn resolve_icon_code(details: Option<&IpDetails>) -> IconCode {
    let Some(details) = details else {
        return IconCode::Unknown;
    };
    if let Some(provider) = provider_for(details) {
        return IconCode::Provider(provider);
    }
    match details.country() {
        Some(country) if !country.trim().is_empty() => {
            IconCode::Country(country.trim().to_lowercase())
        }
        _ => IconCode::Unknown,
    }
}

/// Icon shown in the toolbar for a tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum ToolbarIcon {
    /// An existing asset file
    Asset(PathBuf),
    /// The generated "IP" badge, used when the wanted asset is missing
    Badge,
}

/// Maps icon codes to asset files under an asset directory.
#[derive(Debug, Clone)]
pub struct IconResolver {
    asset_dir: PathBuf,
}

impl IconResolver {
    /// Creates a resolver rooted at `asset_dir`.
    pub fn new(asset_dir: impl Into<PathBuf>) -> Self {
        Self {
            asset_dir: asset_dir.into(),
        }
    }

    /// Root directory of the assets.
    pub fn asset_dir(&self) -> &Path {
        &self.asset_dir
    }

    /// Toolbar icon for a resolved code (`flags-png/<code>.png`).
    pub fn toolbar_flag(&self, code: &IconCode) -> ToolbarIcon {
        self.existing_or_badge(
            self.asset_dir
                .join(FLAGS_PNG_DIR)
                .join(format!("{}.png", code.as_str())),
        )
    }

    /// Generic toolbar icon for tabs without a known IP.
    pub fn toolbar_default(&self) -> ToolbarIcon {
        self.existing_or_badge(self.asset_dir.join(DEFAULT_ICON))
    }

    /// Card flag for a code name (`flags/<name>.svg`), falling back to the
    /// unknown flag when the file does not exist.
    pub fn card_flag(&self, name: &str) -> PathBuf {
        let flags = self.asset_dir.join(FLAGS_SVG_DIR);
        let path = flags.join(format!("{}.svg", name.to_lowercase()));
        if path.is_file() {
            path
        } else {
            flags.join(format!("{}.svg", UNKNOWN_FLAG))
        }
    }

    fn existing_or_badge(&self, path: PathBuf) -> ToolbarIcon {
        if path.is_file() {
            ToolbarIcon::Asset(path)
        } else {
            log::debug!("Icon asset {} missing, using badge", path.display());
            ToolbarIcon::Badge
        }
    }
}
