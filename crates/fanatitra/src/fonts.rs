//! Locating the regular and bold fonts
//!
//! Fonts are looked up among a fixed list of families installed with the
//! operating system. When none is present, Liberation Sans is downloaded
//! once into `<home>/.fonts` and reused on later runs.

use crate::output::home_dir;
use crate::{ReceiptError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Paths to the two font files a receipt needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontPaths {
    pub regular: PathBuf,
    pub bold: PathBuf,
}

impl FontPaths {
    pub fn new(regular: impl Into<PathBuf>, bold: impl Into<PathBuf>) -> Self {
        Self {
            regular: regular.into(),
            bold: bold.into(),
        }
    }

    fn exist(&self) -> bool {
        self.regular.is_file() && self.bold.is_file()
    }
}

/// Source of font paths
pub trait FontResolver {
    fn resolve(&self) -> Result<FontPaths>;
}

/// Always returns the same paths
#[derive(Debug, Clone)]
pub struct FixedFontResolver {
    paths: FontPaths,
}

impl FixedFontResolver {
    pub fn new(paths: FontPaths) -> Self {
        Self { paths }
    }
}

impl FontResolver for FixedFontResolver {
    fn resolve(&self) -> Result<FontPaths> {
        Ok(self.paths.clone())
    }
}

#[cfg(target_os = "windows")]
const SYSTEM_FONTS: &[(&str, &str)] = &[
    ("C:\\Windows\\Fonts\\Arial.ttf", "C:\\Windows\\Fonts\\Arialbd.ttf"),
    ("C:\\Windows\\Fonts\\Calibri.ttf", "C:\\Windows\\Fonts\\Calibrib.ttf"),
    ("C:\\Windows\\Fonts\\Segoeui.ttf", "C:\\Windows\\Fonts\\Segoeuib.ttf"),
];

#[cfg(target_os = "macos")]
const SYSTEM_FONTS: &[(&str, &str)] = &[
    ("/Library/Fonts/Arial.ttf", "/Library/Fonts/Arial Bold.ttf"),
    (
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    ),
];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const SYSTEM_FONTS: &[(&str, &str)] = &[
    (
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/noto/NotoSans-Bold.ttf",
    ),
];

/// Looks for installed fonts, then falls back to a downloaded family
#[derive(Debug, Clone)]
pub struct SystemFontResolver {
    candidates: Vec<FontPaths>,
    fallback: Option<FallbackFonts>,
}

impl SystemFontResolver {
    /// Platform candidates with the download fallback in `<home>/.fonts`
    ///
    /// The home directory is only looked up once no candidate is installed.
    pub fn new() -> Self {
        Self::with_candidates(system_candidates()).with_fallback(FallbackFonts::in_home())
    }

    /// Search only the given candidates, without a fallback
    pub fn with_candidates(candidates: Vec<FontPaths>) -> Self {
        Self {
            candidates,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackFonts) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

impl Default for SystemFontResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FontResolver for SystemFontResolver {
    fn resolve(&self) -> Result<FontPaths> {
        if let Some(paths) = self.candidates.iter().find(|paths| paths.exist()) {
            log::debug!("using system fonts {}", paths.regular.display());
            return Ok(paths.clone());
        }

        match &self.fallback {
            Some(fallback) => {
                log::info!("no system font found, using fallback fonts");
                fallback.ensure()
            }
            None => Err(ReceiptError::FontNotFound(format!(
                "none of {} candidate families is installed",
                self.candidates.len()
            ))),
        }
    }
}

/// Installed font families known for this platform, in preference order
pub fn system_candidates() -> Vec<FontPaths> {
    SYSTEM_FONTS
        .iter()
        .map(|(regular, bold)| FontPaths::new(*regular, *bold))
        .collect()
}

const LIBERATION_BASE_URL: &str =
    "https://github.com/liberationfonts/liberation-fonts/raw/main/liberation-fonts-ttf-2.1.5";
const REGULAR_FILE: &str = "LiberationSans-Regular.ttf";
const BOLD_FILE: &str = "LiberationSans-Bold.ttf";

/// Downloaded fonts cached in a local directory
#[derive(Debug, Clone)]
pub struct FallbackFonts {
    /// `None` stands for `<home>/.fonts`
    dir: Option<PathBuf>,
    base_url: String,
    timeout: Duration,
    attempts: u32,
}

impl FallbackFonts {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            base_url: LIBERATION_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            attempts: 3,
        }
    }

    /// Cache in `<home>/.fonts`, resolved when first needed
    pub fn in_home() -> Self {
        Self {
            dir: None,
            ..Self::new(PathBuf::new())
        }
    }

    fn dir(&self) -> Result<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(home_dir()?.join(".fonts")),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Number of tries per file, at least one
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Where the fonts live once downloaded
    pub fn paths(&self) -> Result<FontPaths> {
        let dir = self.dir()?;
        Ok(FontPaths::new(dir.join(REGULAR_FILE), dir.join(BOLD_FILE)))
    }

    /// Download whichever font file is missing and return both paths
    pub fn ensure(&self) -> Result<FontPaths> {
        let dir = self.dir()?;
        let paths = FontPaths::new(dir.join(REGULAR_FILE), dir.join(BOLD_FILE));
        if paths.exist() {
            return Ok(paths);
        }

        std::fs::create_dir_all(&dir).map_err(|e| {
            ReceiptError::FontDownload(format!("cannot create {}: {e}", dir.display()))
        })?;

        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        for (file, dest) in [(REGULAR_FILE, &paths.regular), (BOLD_FILE, &paths.bold)] {
            if !dest.is_file() {
                let url = format!("{}/{file}", self.base_url);
                self.download(&agent, &url, dest)?;
            }
        }

        Ok(paths)
    }

    fn download(&self, agent: &ureq::Agent, url: &str, dest: &Path) -> Result<()> {
        let mut last_error = String::new();

        for attempt in 1..=self.attempts {
            log::info!("downloading {url} (attempt {attempt}/{})", self.attempts);
            match fetch(agent, url) {
                Ok(bytes) => return store(&bytes, dest),
                Err(err) => {
                    log::warn!("download of {url} failed: {err}");
                    last_error = err;
                }
            }
        }

        Err(ReceiptError::FontDownload(format!("{url}: {last_error}")))
    }
}

fn fetch(agent: &ureq::Agent, url: &str) -> std::result::Result<Vec<u8>, String> {
    let response = agent.get(url).call().map_err(|e| e.to_string())?;
    if response.status() != 200 {
        return Err(format!("unexpected status {}", response.status()));
    }

    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| e.to_string())?;

    if bytes.is_empty() {
        return Err("empty response".to_string());
    }
    Ok(bytes)
}

/// Write to a sibling temp file and rename, so `dest` is never partial
fn store(bytes: &[u8], dest: &Path) -> Result<()> {
    let partial = dest.with_extension("part");
    let write = std::fs::write(&partial, bytes).and_then(|()| std::fs::rename(&partial, dest));

    write.map_err(|e| {
        let _ = std::fs::remove_file(&partial);
        ReceiptError::FontDownload(format!("cannot write {}: {e}", dest.display()))
    })
}
