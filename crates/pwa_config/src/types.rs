//! Configuration types deserialized from `pwa.toml`.

use pwa_common::{AssetKind, Color, ResizeMode};
use serde::Deserialize;
use std::path::PathBuf;

/// The top-level project configuration parsed from `pwa.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PwaConfig {
    /// Web-app manifest metadata.
    pub app: AppMeta,
    /// How generated files are served.
    #[serde(default)]
    pub web: WebConfig,
    /// Source icon specs per asset category.
    #[serde(default)]
    pub icons: IconsConfig,
    /// `<link>` tags the user already wrote into their HTML template.
    #[serde(default)]
    pub links: Vec<LinkSpec>,
}

/// Web-app metadata copied into `manifest.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppMeta {
    /// Full application name.
    pub name: String,
    /// Short name for home screens; defaults to `name`.
    #[serde(default)]
    pub short_name: Option<String>,
    /// A brief description of the app.
    #[serde(default)]
    pub description: Option<String>,
    /// URL loaded when the app is launched.
    #[serde(default = "default_root_url")]
    pub start_url: String,
    /// Navigation scope of the app.
    #[serde(default = "default_root_url")]
    pub scope: String,
    /// Preferred display mode.
    #[serde(default)]
    pub display: DisplayMode,
    /// Preferred orientation (`any`, `portrait`, `landscape`, ...).
    #[serde(default)]
    pub orientation: Option<String>,
    /// Splash background color.
    #[serde(default)]
    pub background_color: Option<Color>,
    /// Browser UI theme color.
    #[serde(default)]
    pub theme_color: Option<Color>,
    /// Primary language tag.
    #[serde(default)]
    pub lang: Option<String>,
}

fn default_root_url() -> String {
    "/".to_string()
}

/// Manifest display mode.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    /// No browser UI at all.
    Fullscreen,
    /// Looks like a standalone app (default).
    #[default]
    Standalone,
    /// Minimal navigation controls.
    MinimalUi,
    /// A regular browser tab.
    Browser,
}

impl DisplayMode {
    /// The manifest string for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Fullscreen => "fullscreen",
            DisplayMode::Standalone => "standalone",
            DisplayMode::MinimalUi => "minimal-ui",
            DisplayMode::Browser => "browser",
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// URL prefix generated files are served under.
    #[serde(default = "default_root_url")]
    pub public_path: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            public_path: default_root_url(),
        }
    }
}

/// Source icon per category, with an optional shared fallback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IconsConfig {
    /// Used for any category without its own entry.
    #[serde(default)]
    pub default: Option<IconSpec>,
    /// Favicon source.
    #[serde(default)]
    pub favicon: Option<IconSpec>,
    /// Touch icon source.
    #[serde(default)]
    pub touch: Option<IconSpec>,
    /// Manifest icon source.
    #[serde(default)]
    pub chrome: Option<IconSpec>,
    /// Splash screen source.
    #[serde(default)]
    pub splash: Option<IconSpec>,
}

impl IconsConfig {
    /// Returns the icon spec for a category, falling back to `default`.
    pub fn spec_for(&self, kind: AssetKind) -> Option<&IconSpec> {
        let specific = match kind {
            AssetKind::Favicon => self.favicon.as_ref(),
            AssetKind::PlatformIcon => self.touch.as_ref(),
            AssetKind::ManifestIcon => self.chrome.as_ref(),
            AssetKind::Splash => self.splash.as_ref(),
        };
        specific.or(self.default.as_ref())
    }
}

/// Caller-supplied description of a source icon.
///
/// The target width and height are not part of the spec; they come from the
/// size set or device matrix of the category being generated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IconSpec {
    /// Path of the source image, relative to the project root.
    pub src: PathBuf,
    /// Fill behind the source image.
    #[serde(default = "transparent")]
    pub background_color: Color,
    /// How the source is fitted into each target size.
    #[serde(default)]
    pub resize_mode: ResizeMode,
    /// Optional output file name prefix.
    #[serde(default)]
    pub name: Option<String>,
}

fn transparent() -> Color {
    Color::TRANSPARENT
}

impl IconSpec {
    /// Creates a spec with a transparent background and `contain` fitting.
    pub fn new(src: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            background_color: Color::TRANSPARENT,
            resize_mode: ResizeMode::Contain,
            name: None,
        }
    }
}

/// A `<link>` tag the user already declared.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LinkSpec {
    /// The `rel` attribute (may hold several space-separated values).
    #[serde(default)]
    pub rel: Option<String>,
    /// The `sizes` attribute.
    #[serde(default)]
    pub sizes: Option<String>,
    /// The `href` attribute.
    #[serde(default)]
    pub href: Option<String>,
    /// The `media` attribute.
    #[serde(default)]
    pub media: Option<String>,
}

impl LinkSpec {
    /// Returns `true` if `rel` contains `value` as one of its tokens.
    pub fn has_rel(&self, value: &str) -> bool {
        self.rel
            .as_deref()
            .is_some_and(|rel| rel.split_whitespace().any(|r| r == value))
    }
}
