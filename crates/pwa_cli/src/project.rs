//! Shared project plumbing for the subcommands.
//!
//! Finds the project root, loads `pwa.toml`, builds the pipeline and writes
//! generated outputs to disk.

use std::path::{Path, PathBuf};

use anyhow::Context;
use pwa_config::{find_project_root, load_config, load_config_from_str, LinkSpec, PwaConfig};
use pwa_pipeline::{AssetOutput, AssetPipeline, ImageBackend, ImageIcoAssembler, ProjectOptions};

use crate::GlobalArgs;

/// A loaded project.
#[derive(Debug)]
pub struct Project {
    /// Directory holding `pwa.toml`; icon paths resolve against it.
    pub root: PathBuf,
    /// Parsed configuration.
    pub config: PwaConfig,
}

impl Project {
    /// Locates and loads the project selected by the global flags.
    pub fn load(global: &GlobalArgs) -> anyhow::Result<Self> {
        let root = resolve_project_root(global)?;
        let config = match &global.config {
            Some(path) if path.is_file() => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("read config '{}'", path.display()))?;
                load_config_from_str(&content)
            }
            _ => load_config(&root),
        }
        .with_context(|| format!("load project config in '{}'", root.display()))?;
        Ok(Self { root, config })
    }

    /// A pipeline with the default image backends over this project.
    pub fn pipeline(&self) -> AssetPipeline {
        let options = ProjectOptions::new(&self.root)
            .with_public_path(self.config.web.public_path.clone());
        AssetPipeline::new(options, ImageBackend, ImageIcoAssembler)
    }
}

/// Resolves the project root from `--config` or by walking up from the
/// current directory.
pub fn resolve_project_root(global: &GlobalArgs) -> anyhow::Result<PathBuf> {
    if let Some(config_path) = &global.config {
        if config_path.is_file() {
            Ok(config_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(config_path.clone())
        }
    } else {
        let cwd = std::env::current_dir().context("read current directory")?;
        find_project_root(&cwd).with_context(|| {
            format!("no pwa.toml found in '{}' or any parent", cwd.display())
        })
    }
}

/// Result of [`write_outputs`].
#[derive(Debug, Default)]
pub struct WriteReport<'a> {
    /// Outputs written to disk.
    pub written: Vec<&'a AssetOutput>,
    /// Outputs skipped because the user already declares them.
    pub skipped: Vec<&'a AssetOutput>,
}

/// Writes every output not already declared by `links` under `out_dir`.
pub fn write_outputs<'a>(
    out_dir: &Path,
    outputs: &'a [AssetOutput],
    links: &[LinkSpec],
) -> anyhow::Result<WriteReport<'a>> {
    let mut report = WriteReport::default();
    for output in outputs {
        if output.is_declared_by(links) {
            tracing::info!(path = %output.relative_path, "skipping output declared in [[links]]");
            report.skipped.push(output);
            continue;
        }
        let path = out_dir.join(&output.relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(&path, &output.bytes)
            .with_context(|| format!("write '{}'", path.display()))?;
        report.written.push(output);
    }
    Ok(report)
}

/// Prints written outputs: JSON on request, otherwise their HTML tags.
pub fn print_outputs(outputs: &[&AssetOutput], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outputs)?);
        return Ok(());
    }
    for output in outputs {
        if let Some(tag) = &output.html_tag {
            println!("{}", tag.to_html());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwa_pipeline::{HtmlTag, LinkAttributes};
    use tempfile::TempDir;

    fn global(config: Option<PathBuf>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config,
        }
    }

    fn output(path: &str, rel: &str, sizes: Option<&str>) -> AssetOutput {
        AssetOutput {
            bytes: path.as_bytes().to_vec(),
            relative_path: path.to_string(),
            html_tag: Some(HtmlTag::link(LinkAttributes {
                rel: rel.to_string(),
                href: format!("/{path}"),
                sizes: sizes.map(str::to_string),
                ..Default::default()
            })),
            manifest_icon: None,
        }
    }

    #[test]
    fn resolve_project_root_from_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("pwa.toml");
        std::fs::write(&config_path, "[app]\nname = \"t\"\n").unwrap();
        let root = resolve_project_root(&global(Some(config_path))).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn resolve_project_root_from_config_dir() {
        let tmp = TempDir::new().unwrap();
        let root = resolve_project_root(&global(Some(tmp.path().to_path_buf()))).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn load_reads_custom_config_file_name() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("staging.toml");
        std::fs::write(&config_path, "[app]\nname = \"Staging\"\n").unwrap();
        let project = Project::load(&global(Some(config_path))).unwrap();
        assert_eq!(project.root, tmp.path());
        assert_eq!(project.config.app.name, "Staging");
    }

    #[test]
    fn load_without_config_fails() {
        let tmp = TempDir::new().unwrap();
        let err = Project::load(&global(Some(tmp.path().to_path_buf()))).unwrap_err();
        assert!(format!("{err:#}").contains("load project config"));
    }

    #[test]
    fn write_skips_declared_outputs() {
        let out = TempDir::new().unwrap();
        let outputs = vec![
            output("favicon-16x16.png", "icon", Some("16x16")),
            output("favicon-32x32.png", "icon", Some("32x32")),
            output(
                "pwa/apple-touch-icon/apple-touch-icon-180x180.png",
                "apple-touch-icon",
                Some("180x180"),
            ),
        ];
        let links = vec![LinkSpec {
            rel: Some("icon".into()),
            sizes: Some("32x32".into()),
            href: Some("/mine.png".into()),
            media: None,
        }];

        let report = write_outputs(out.path(), &outputs, &links).unwrap();
        assert_eq!(report.written.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].relative_path, "favicon-32x32.png");
        assert!(out.path().join("favicon-16x16.png").is_file());
        assert!(!out.path().join("favicon-32x32.png").exists());
        assert!(out
            .path()
            .join("pwa/apple-touch-icon/apple-touch-icon-180x180.png")
            .is_file());
    }
}
