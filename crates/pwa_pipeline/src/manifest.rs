//! The web-app manifest (`manifest.json`).

use pwa_common::Color;
use pwa_config::PwaConfig;
use serde::Serialize;

use crate::output::ManifestIcon;

/// File name of the generated manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Serializable `manifest.json` contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebManifest {
    /// Full application name.
    pub name: String,
    /// Home-screen name.
    pub short_name: String,
    /// App description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Launch URL.
    pub start_url: String,
    /// Navigation scope.
    pub scope: String,
    /// Display mode keyword.
    pub display: String,
    /// Preferred orientation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    /// Splash background color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    /// Browser UI color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<Color>,
    /// Language tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Icon descriptors.
    pub icons: Vec<ManifestIcon>,
}

/// Builds the manifest for `config` with the given icons.
pub fn generate_manifest_json(config: &PwaConfig, icons: &[ManifestIcon]) -> WebManifest {
    let app = &config.app;
    WebManifest {
        name: app.name.clone(),
        short_name: app.short_name.clone().unwrap_or_else(|| app.name.clone()),
        description: app.description.clone(),
        start_url: app.start_url.clone(),
        scope: app.scope.clone(),
        display: app.display.as_str().to_string(),
        orientation: app.orientation.clone(),
        background_color: app.background_color,
        theme_color: app.theme_color,
        lang: app.lang.clone(),
        icons: icons.to_vec(),
    }
}
