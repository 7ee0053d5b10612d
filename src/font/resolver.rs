//! Choosing the text font from an ordered list of candidates.

use super::{FontRegistry, TrueTypeFont};
use std::path::{Path, PathBuf};

/// Registry name of the resolved Japanese-capable font.
pub const JAPANESE_FONT: &str = "Japanese";

/// Base-14 font used when no candidate loads.
pub const FALLBACK_FONT: &str = "Helvetica";

/// A font file to try, with the face index inside collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontCandidate {
    pub path: PathBuf,
    pub index: u32,
}

impl FontCandidate {
    /// Candidate for the first face of a file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            index: 0,
        }
    }

    /// Candidate for a specific face of a collection.
    pub fn with_index(path: impl Into<PathBuf>, index: u32) -> Self {
        Self {
            path: path.into(),
            index,
        }
    }
}

/// Platform font locations, regular Japanese font first.
pub fn default_candidates() -> Vec<FontCandidate> {
    let mut candidates = Vec::new();
    if cfg!(target_os = "windows") {
        let fonts = windows_font_dir();
        candidates.push(FontCandidate::new(fonts.join("msgothic.ttc")));
        candidates.push(FontCandidate::new(fonts.join("meiryo.ttc")));
    } else if cfg!(target_os = "macos") {
        candidates.push(FontCandidate::new(
            "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
        ));
        candidates.push(FontCandidate::new("/Library/Fonts/Osaka.ttf"));
        candidates.push(FontCandidate::new("/System/Library/Fonts/Supplemental/Osaka.ttf"));
    } else {
        for path in [
            "/usr/share/fonts/opentype/ipafont-gothic/ipag.ttf",
            "/usr/share/fonts/truetype/ipafont-gothic/ipag.ttf",
            "/usr/share/fonts/ipa-gothic/ipag.ttf",
            "/usr/share/fonts/opentype/ipaexfont-gothic/ipaexg.ttf",
            "/usr/share/fonts/truetype/ipaexfont-gothic/ipaexg.ttf",
            "/usr/share/fonts/truetype/takao-gothic/TakaoGothic.ttf",
            "/usr/share/fonts/truetype/vlgothic/VL-Gothic-Regular.ttf",
        ] {
            candidates.push(FontCandidate::new(path));
        }
    }
    candidates
}

fn windows_font_dir() -> PathBuf {
    std::env::var_os("WINDIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("C:\\Windows"))
        .join("Fonts")
}

/// Outcome of font resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontResolution {
    /// Font name every text style uses
    pub font_name: String,
    /// Candidate that was registered, if any
    pub source: Option<PathBuf>,
    /// Message shown when falling back to the base font
    pub warning: Option<String>,
}

impl FontResolution {
    /// Whether a Japanese-capable font was registered.
    pub fn is_fallback(&self) -> bool {
        self.source.is_none()
    }
}

/// Tries font candidates in priority order.
#[derive(Debug, Clone)]
pub struct FontResolver {
    candidates: Vec<FontCandidate>,
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FontResolver {
    /// Resolver over the platform's default candidates.
    pub fn new() -> Self {
        Self::with_candidates(default_candidates())
    }

    /// Resolver over an explicit candidate list.
    pub fn with_candidates(candidates: Vec<FontCandidate>) -> Self {
        Self { candidates }
    }

    /// Try `font` before every other candidate.
    pub fn prefer(mut self, font: impl AsRef<Path>) -> Self {
        self.candidates
            .insert(0, FontCandidate::new(font.as_ref().to_path_buf()));
        self
    }

    pub fn candidates(&self) -> &[FontCandidate] {
        &self.candidates
    }

    /// Register the first loadable candidate as [`JAPANESE_FONT`].
    ///
    /// Never fails: when nothing loads, the base font is selected and a
    /// warning is returned for the caller to report.
    pub fn resolve(&self, registry: &mut FontRegistry) -> FontResolution {
        for candidate in &self.candidates {
            match TrueTypeFont::from_path(&candidate.path, candidate.index) {
                Ok(font) => {
                    log::info!(
                        "registered {} from {}",
                        font.postscript_name(),
                        candidate.path.display()
                    );
                    registry.register(JAPANESE_FONT, font);
                    return FontResolution {
                        font_name: JAPANESE_FONT.to_string(),
                        source: Some(candidate.path.clone()),
                        warning: None,
                    };
                }
                Err(e) => log::debug!("font candidate skipped: {}", e),
            }
        }

        let warning = format!(
            "Japanese font not found, using {} (Japanese text may not display correctly)",
            FALLBACK_FONT
        );
        log::debug!("{}", warning);
        FontResolution {
            font_name: FALLBACK_FONT.to_string(),
            source: None,
            warning: Some(warning),
        }
    }
}
