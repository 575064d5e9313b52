//! The asset pipeline: request expansion, cached rendering and output assembly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pwa_cache::{AssetCache, CacheRun, RenderRequest};
use pwa_common::{AssetKind, Color, ResizeMode};
use pwa_config::{resolve_project_config, IconSpec, PwaConfig};
use rayon::prelude::*;

use crate::backend::{IcoAssembler, IcoOptions, RenderBackend, RenderParams, SourceImage};
use crate::devices::{DeviceFilter, DeviceMatrix, OrientationFilter};
use crate::error::PipelineError;
use crate::manifest::{generate_manifest_json, MANIFEST_FILE};
use crate::output::{public_url, AssetOutput, HtmlTag, LinkAttributes, ManifestIcon};
use crate::source::{IconSource, RequestKind, SplashIcon};

/// Favicon PNG sizes, ascending. The last one feeds `favicon.ico`.
pub const FAVICON_SIZES: [u32; 3] = [16, 32, 48];

/// Apple touch icon sizes.
pub const PLATFORM_ICON_SIZES: [u32; 1] = [180];

/// Web-app manifest icon sizes, ascending.
pub const MANIFEST_ICON_SIZES: [u32; 3] = [144, 192, 512];

const PNG_MIME: &str = "image/png";
const ICO_FILE: &str = "favicon.ico";

/// Where a project lives and how its files are served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectOptions {
    /// Project root; relative icon paths and the cache resolve against it.
    pub project_root: Option<PathBuf>,
    /// URL prefix generated files are served under.
    pub public_path: String,
}

impl ProjectOptions {
    /// Options for the project at `root`, served from `/`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: Some(root.into()),
            public_path: "/".to_string(),
        }
    }

    /// Sets the public path.
    pub fn with_public_path(mut self, public_path: impl Into<String>) -> Self {
        self.public_path = public_path.into();
        self
    }
}

impl Default for ProjectOptions {
    fn default() -> Self {
        Self {
            project_root: None,
            public_path: "/".to_string(),
        }
    }
}

/// Generates web-app image assets through a persistent render cache.
///
/// Each call to a `generate*` method is one cache run for its category:
/// every required raster is looked up or rendered (in parallel), and once all
/// of them succeeded, cache entries of that category the call did not need
/// are deleted.
pub struct AssetPipeline {
    options: ProjectOptions,
    project_id: Option<String>,
    cache: Option<AssetCache>,
    backend: Box<dyn RenderBackend>,
    ico: Box<dyn IcoAssembler>,
    devices: DeviceMatrix,
}

/// A raster to produce, fully resolved except for its bytes.
struct PlannedOutput {
    source: Arc<SourceImage>,
    params: RenderParams,
    relative_path: String,
    html_tag: Option<HtmlTag>,
    manifest_icon: Option<ManifestIcon>,
}

impl AssetPipeline {
    /// Creates a pipeline using the project's default cache directory.
    pub fn new(
        options: ProjectOptions,
        backend: impl RenderBackend + 'static,
        ico: impl IcoAssembler + 'static,
    ) -> Self {
        let cache = options.project_root.as_deref().map(AssetCache::for_project);
        let project_id = options.project_root.as_deref().map(project_identity);
        Self {
            options,
            project_id,
            cache,
            backend: Box::new(backend),
            ico: Box::new(ico),
            devices: DeviceMatrix::builtin(),
        }
    }

    /// Replaces the cache.
    pub fn with_cache(mut self, cache: AssetCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replaces the device catalog used to expand splash requests.
    pub fn with_devices(mut self, devices: DeviceMatrix) -> Self {
        self.devices = devices;
        self
    }

    /// Project options the pipeline was created with.
    pub fn options(&self) -> &ProjectOptions {
        &self.options
    }

    /// The render cache, if a project context is available.
    pub fn cache(&self) -> Option<&AssetCache> {
        self.cache.as_ref()
    }

    /// The device catalog.
    pub fn devices(&self) -> &DeviceMatrix {
        &self.devices
    }

    /// Generates the assets for a kind given by name.
    ///
    /// Accepts `favicon`, `safari-icon`, `chrome-icon`, `splash` (and the
    /// canonical category names) plus `manifest`. The kind is validated
    /// before anything else happens.
    pub fn generate(
        &self,
        kind: &str,
        source: &IconSource,
    ) -> Result<Vec<AssetOutput>, PipelineError> {
        match kind.parse::<RequestKind>()? {
            RequestKind::Manifest => Ok(vec![self.generate_manifest(None, &[])?]),
            RequestKind::Asset(kind) => self.generate_kind(kind, source),
        }
    }

    /// Favicon PNGs at [`FAVICON_SIZES`] followed by `favicon.ico`.
    ///
    /// Favicons are always rendered on a transparent background with
    /// `contain` fitting, whatever the spec says.
    pub fn generate_favicon(&self, spec: &IconSpec) -> Result<Vec<AssetOutput>, PipelineError> {
        self.generate_kind(AssetKind::Favicon, &IconSource::Single(spec.clone()))
    }

    /// Apple touch icons at [`PLATFORM_ICON_SIZES`].
    pub fn generate_platform_icon(
        &self,
        spec: &IconSpec,
    ) -> Result<Vec<AssetOutput>, PipelineError> {
        self.generate_kind(AssetKind::PlatformIcon, &IconSource::Single(spec.clone()))
    }

    /// Manifest icons at [`MANIFEST_ICON_SIZES`].
    pub fn generate_manifest_icons(
        &self,
        spec: &IconSpec,
    ) -> Result<Vec<AssetOutput>, PipelineError> {
        self.generate_kind(AssetKind::ManifestIcon, &IconSource::Single(spec.clone()))
    }

    /// Splash screens, one per device and orientation.
    ///
    /// A single spec is expanded over the phone entries of the device
    /// catalog. An explicit list is used as given.
    pub fn generate_splash(&self, source: &IconSource) -> Result<Vec<AssetOutput>, PipelineError> {
        self.generate_kind(AssetKind::Splash, source)
    }

    /// Builds `manifest.json` and the `<link rel="manifest">` tag.
    ///
    /// Without an explicit `config`, `pwa.toml` is loaded from the project
    /// root.
    pub fn generate_manifest(
        &self,
        config: Option<&PwaConfig>,
        icons: &[ManifestIcon],
    ) -> Result<AssetOutput, PipelineError> {
        let config = resolve_project_config(config, self.options.project_root.as_deref())?;
        let manifest = generate_manifest_json(&config, icons);
        let bytes = serde_json::to_vec_pretty(&manifest).map_err(|e| PipelineError::Manifest {
            reason: e.to_string(),
        })?;
        Ok(AssetOutput {
            bytes,
            relative_path: MANIFEST_FILE.to_string(),
            html_tag: Some(HtmlTag::link(LinkAttributes {
                rel: "manifest".to_string(),
                href: self.href(MANIFEST_FILE),
                ..Default::default()
            })),
            manifest_icon: None,
        })
    }

    fn generate_kind(
        &self,
        kind: AssetKind,
        source: &IconSource,
    ) -> Result<Vec<AssetOutput>, PipelineError> {
        let (root, project, cache) = self.context()?;
        let mut sources = SourceLoader::new(root);

        let plans = match (kind, source) {
            (AssetKind::Splash, IconSource::Expanded(icons)) => {
                self.plan_listed_splash(icons, &mut sources)?
            }
            (_, IconSource::Expanded(_)) => {
                return Err(PipelineError::UnsupportedSource {
                    kind: kind.to_string(),
                })
            }
            (AssetKind::Favicon, IconSource::Single(spec)) => {
                self.plan_favicon(spec, &mut sources)?
            }
            (AssetKind::PlatformIcon, IconSource::Single(spec)) => {
                self.plan_platform_icon(spec, &mut sources)?
            }
            (AssetKind::ManifestIcon, IconSource::Single(spec)) => {
                self.plan_manifest_icons(spec, &mut sources)?
            }
            (AssetKind::Splash, IconSource::Single(spec)) => {
                self.plan_device_splash(spec, &mut sources)?
            }
        };

        let run = cache.begin_run(kind);
        let mut outputs = self.render_all(cache, &run, project, plans)?;
        if kind == AssetKind::Favicon {
            outputs.push(self.favicon_ico(&outputs)?);
        }
        let removed = cache.sweep(run);

        tracing::info!(
            %kind,
            outputs = outputs.len(),
            removed,
            "generated assets"
        );
        Ok(outputs)
    }

    fn context(&self) -> Result<(&Path, &str, &AssetCache), PipelineError> {
        match (
            self.options.project_root.as_deref(),
            self.project_id.as_deref(),
            self.cache.as_ref(),
        ) {
            (Some(root), Some(project), Some(cache)) => Ok((root, project, cache)),
            _ => Err(PipelineError::MissingProjectContext),
        }
    }

    fn render_all(
        &self,
        cache: &AssetCache,
        run: &CacheRun,
        project: &str,
        plans: Vec<PlannedOutput>,
    ) -> Result<Vec<AssetOutput>, PipelineError> {
        let kind = run.kind();
        plans
            .into_par_iter()
            .map(|plan| {
                let RenderParams {
                    width,
                    height,
                    background,
                    resize_mode,
                } = plan.params;
                let request = RenderRequest {
                    kind,
                    project: project.to_string(),
                    width,
                    height,
                    background,
                    resize_mode,
                    source: plan.source.fingerprint,
                };
                let bytes = cache
                    .get_or_render(run, &request, || {
                        self.backend.render(&plan.source, &plan.params)
                    })
                    .map_err(|source| PipelineError::RenderFailure {
                        width,
                        height,
                        source,
                    })?;
                Ok(AssetOutput {
                    bytes,
                    relative_path: plan.relative_path,
                    html_tag: plan.html_tag,
                    manifest_icon: plan.manifest_icon,
                })
            })
            .collect()
    }

    fn favicon_ico(&self, pngs: &[AssetOutput]) -> Result<AssetOutput, PipelineError> {
        let largest: Vec<Vec<u8>> = pngs.last().map(|o| o.bytes.clone()).into_iter().collect();
        let bytes = self
            .ico
            .assemble(&largest, IcoOptions { resize: true })
            .map_err(|source| PipelineError::IcoAssembly { source })?;
        Ok(AssetOutput {
            bytes,
            relative_path: ICO_FILE.to_string(),
            html_tag: Some(HtmlTag::link(LinkAttributes {
                rel: "shortcut icon".to_string(),
                href: self.href(ICO_FILE),
                ..Default::default()
            })),
            manifest_icon: None,
        })
    }

    fn plan_favicon(
        &self,
        spec: &IconSpec,
        sources: &mut SourceLoader<'_>,
    ) -> Result<Vec<PlannedOutput>, PipelineError> {
        let source = sources.load(&spec.src)?;
        let prefix = spec.name.as_deref().unwrap_or("favicon");
        Ok(FAVICON_SIZES
            .iter()
            .map(|&size| {
                let sizes = size_label(size, size);
                let relative_path = format!("{prefix}-{sizes}.png");
                PlannedOutput {
                    source: Arc::clone(&source),
                    params: RenderParams {
                        width: size,
                        height: size,
                        background: Color::TRANSPARENT,
                        resize_mode: ResizeMode::Contain,
                    },
                    html_tag: Some(HtmlTag::link(LinkAttributes {
                        rel: "icon".to_string(),
                        href: self.href(&relative_path),
                        sizes: Some(sizes),
                        mime_type: Some(PNG_MIME.to_string()),
                        media: None,
                    })),
                    manifest_icon: None,
                    relative_path,
                }
            })
            .collect())
    }

    fn plan_platform_icon(
        &self,
        spec: &IconSpec,
        sources: &mut SourceLoader<'_>,
    ) -> Result<Vec<PlannedOutput>, PipelineError> {
        let source = sources.load(&spec.src)?;
        Ok(PLATFORM_ICON_SIZES
            .iter()
            .map(|&size| {
                let sizes = size_label(size, size);
                let relative_path = nested_path(AssetKind::PlatformIcon, spec, size, size);
                PlannedOutput {
                    source: Arc::clone(&source),
                    params: spec_params(spec, size, size),
                    html_tag: Some(HtmlTag::link(LinkAttributes {
                        rel: "apple-touch-icon".to_string(),
                        href: self.href(&relative_path),
                        sizes: Some(sizes),
                        ..Default::default()
                    })),
                    manifest_icon: None,
                    relative_path,
                }
            })
            .collect())
    }

    fn plan_manifest_icons(
        &self,
        spec: &IconSpec,
        sources: &mut SourceLoader<'_>,
    ) -> Result<Vec<PlannedOutput>, PipelineError> {
        let source = sources.load(&spec.src)?;
        Ok(MANIFEST_ICON_SIZES
            .iter()
            .map(|&size| {
                let relative_path = nested_path(AssetKind::ManifestIcon, spec, size, size);
                PlannedOutput {
                    source: Arc::clone(&source),
                    params: spec_params(spec, size, size),
                    html_tag: None,
                    manifest_icon: Some(ManifestIcon {
                        src: self.href(&relative_path),
                        sizes: size_label(size, size),
                        mime_type: PNG_MIME.to_string(),
                    }),
                    relative_path,
                }
            })
            .collect())
    }

    fn plan_device_splash(
        &self,
        spec: &IconSpec,
        sources: &mut SourceLoader<'_>,
    ) -> Result<Vec<PlannedOutput>, PipelineError> {
        let source = sources.load(&spec.src)?;
        let filter = DeviceFilter {
            orientation: OrientationFilter::Any,
            include_tablets: false,
        };
        Ok(self
            .devices
            .splash_targets(filter)
            .into_iter()
            .map(|target| {
                let source = Arc::clone(&source);
                self.plan_splash(source, spec, target.width, target.height, target.media)
            })
            .collect())
    }

    fn plan_listed_splash(
        &self,
        icons: &[SplashIcon],
        sources: &mut SourceLoader<'_>,
    ) -> Result<Vec<PlannedOutput>, PipelineError> {
        icons
            .iter()
            .map(|icon| {
                let source = sources.load(&icon.spec.src)?;
                let media = icon.media.clone();
                Ok(self.plan_splash(source, &icon.spec, icon.width, icon.height, media))
            })
            .collect()
    }

    fn plan_splash(
        &self,
        source: Arc<SourceImage>,
        spec: &IconSpec,
        width: u32,
        height: u32,
        media: String,
    ) -> PlannedOutput {
        let relative_path = nested_path(AssetKind::Splash, spec, width, height);
        PlannedOutput {
            source,
            params: spec_params(spec, width, height),
            html_tag: Some(HtmlTag::link(LinkAttributes {
                rel: "apple-touch-startup-image".to_string(),
                href: self.href(&relative_path),
                media: Some(media),
                ..Default::default()
            })),
            manifest_icon: None,
            relative_path,
        }
    }

    fn href(&self, relative_path: &str) -> String {
        public_url(&self.options.public_path, relative_path)
    }
}

/// Reads each distinct source file once per generation call.
struct SourceLoader<'a> {
    root: &'a Path,
    loaded: HashMap<PathBuf, Arc<SourceImage>>,
}

impl<'a> SourceLoader<'a> {
    fn new(root: &'a Path) -> Self {
        Self {
            root,
            loaded: HashMap::new(),
        }
    }

    fn load(&mut self, src: &Path) -> Result<Arc<SourceImage>, PipelineError> {
        let path = self.root.join(src);
        if let Some(source) = self.loaded.get(&path) {
            return Ok(Arc::clone(source));
        }
        let source = SourceImage::read(&path)
            .map(Arc::new)
            .map_err(|source| PipelineError::SourceUnreadable {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), fingerprint = %source.fingerprint, "loaded source image");
        self.loaded.insert(path, Arc::clone(&source));
        Ok(source)
    }
}

fn spec_params(spec: &IconSpec, width: u32, height: u32) -> RenderParams {
    RenderParams {
        width,
        height,
        background: spec.background_color,
        resize_mode: spec.resize_mode,
    }
}

fn size_label(width: u32, height: u32) -> String {
    format!("{width}x{height}")
}

/// `pwa/<kind dir>/<prefix>-<w>x<h>.png`; the prefix defaults to the kind dir.
fn nested_path(kind: AssetKind, spec: &IconSpec, width: u32, height: u32) -> String {
    let dir = kind.dir_name();
    let prefix = spec.name.as_deref().unwrap_or(dir);
    format!("pwa/{dir}/{prefix}-{}.png", size_label(width, height))
}

fn project_identity(root: &Path) -> String {
    std::fs::canonicalize(root)
        .unwrap_or_else(|_| root.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ImageBackend, ImageIcoAssembler};

    #[test]
    fn size_sets_are_ascending() {
        let sets: [&[u32]; 3] = [&FAVICON_SIZES, &PLATFORM_ICON_SIZES, &MANIFEST_ICON_SIZES];
        for sizes in sets {
            assert!(sizes.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn nested_paths() {
        let spec = IconSpec::new("icon.png");
        assert_eq!(
            nested_path(AssetKind::PlatformIcon, &spec, 180, 180),
            "pwa/apple-touch-icon/apple-touch-icon-180x180.png"
        );
        assert_eq!(
            nested_path(AssetKind::Splash, &spec, 1334, 750),
            "pwa/apple-touch-startup-image/apple-touch-startup-image-1334x750.png"
        );
        let named = IconSpec {
            name: Some("launch".into()),
            ..IconSpec::new("icon.png")
        };
        assert_eq!(
            nested_path(AssetKind::Splash, &named, 640, 1136),
            "pwa/apple-touch-startup-image/launch-640x1136.png"
        );
    }

    #[test]
    fn missing_root_is_missing_context() {
        let pipeline =
            AssetPipeline::new(ProjectOptions::default(), ImageBackend, ImageIcoAssembler);
        let err = pipeline
            .generate_favicon(&IconSpec::new("icon.png"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::MissingProjectContext));

        let err = pipeline.generate_manifest(None, &[]).unwrap_err();
        assert!(matches!(err, PipelineError::MissingProjectContext));
    }

    #[test]
    fn explicit_config_needs_no_root() {
        let pipeline = AssetPipeline::new(
            ProjectOptions::default().with_public_path("/app"),
            ImageBackend,
            ImageIcoAssembler,
        );
        let config = pwa_config::load_config_from_str("[app]\nname = \"Solo\"\n").unwrap();
        let out = pipeline.generate_manifest(Some(&config), &[]).unwrap();
        assert_eq!(out.relative_path, "manifest.json");
        assert_eq!(out.html_tag.unwrap().attributes.href, "/app/manifest.json");
        let json: serde_json::Value = serde_json::from_slice(&out.bytes).unwrap();
        assert_eq!(json["name"], "Solo");
    }

    #[test]
    fn source_loader_reads_each_file_once() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"one").unwrap();
        let mut loader = SourceLoader::new(dir.path());
        let first = loader.load(Path::new("a.png")).unwrap();
        std::fs::write(dir.path().join("a.png"), b"two").unwrap();
        let second = loader.load(Path::new("a.png")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn source_loader_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = SourceLoader::new(dir.path());
        let err = loader.load(Path::new("missing.png")).unwrap_err();
        match err {
            PipelineError::SourceUnreadable { path, .. } => {
                assert_eq!(path, dir.path().join("missing.png"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
