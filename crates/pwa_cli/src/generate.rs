//! `pwa generate`: one asset category.

use anyhow::Context;
use pwa_config::IconSpec;
use pwa_pipeline::{IconSource, RequestKind};

use crate::project::{print_outputs, write_outputs, Project};
use crate::{GenerateArgs, GlobalArgs};

/// Runs the `pwa generate` command.
///
/// The icon comes from `--src` when given, otherwise from the kind's
/// `[icons.*]` entry in `pwa.toml` (falling back to `[icons.default]`).
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> anyhow::Result<()> {
    let kind: RequestKind = args.kind.parse()?;
    let project = Project::load(global)?;
    let pipeline = project.pipeline();

    let outputs = match kind {
        RequestKind::Manifest => vec![pipeline.generate_manifest(Some(&project.config), &[])?],
        RequestKind::Asset(asset) => {
            let spec = match &args.src {
                Some(src) => IconSpec::new(src),
                None => project
                    .config
                    .icons
                    .spec_for(asset)
                    .cloned()
                    .with_context(|| {
                        format!("no icon configured for {asset}; add [icons.default] or pass --src")
                    })?,
            };
            pipeline.generate(&args.kind, &IconSource::Single(spec))?
        }
    };

    let report = write_outputs(&args.out, &outputs, &project.config.links)?;
    if !global.quiet {
        let (hits, renders) = pipeline
            .cache()
            .map(|c| (c.hits(), c.renders()))
            .unwrap_or_default();
        eprintln!(
            "   Generated {} {} file(s) in {} ({} cached, {} rendered, {} already declared)",
            report.written.len(),
            kind,
            args.out.display(),
            hits,
            renders,
            report.skipped.len()
        );
    }
    print_outputs(&report.written, args.json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write_icon(root: &Path) {
        let img = image::RgbaImage::from_pixel(32, 32, image::Rgba([0, 90, 200, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        std::fs::create_dir_all(root.join("assets")).unwrap();
        std::fs::write(root.join("assets/icon.png"), buf).unwrap();
    }

    fn project_with(config: &str) -> TempDir {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("pwa.toml"), config).unwrap();
        write_icon(tmp.path());
        tmp
    }

    fn args(kind: &str, out: PathBuf) -> GenerateArgs {
        GenerateArgs {
            kind: kind.to_string(),
            out,
            src: None,
            json: false,
        }
    }

    fn global(root: &Path) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(root.to_path_buf()),
        }
    }

    #[test]
    fn generates_configured_kind() {
        let tmp = project_with("[app]\nname = \"t\"\n[icons.default]\nsrc = \"assets/icon.png\"\n");
        let out = tmp.path().join("dist");
        run(&args("safari-icon", out.clone()), &global(tmp.path())).unwrap();
        assert!(out
            .join("pwa/apple-touch-icon/apple-touch-icon-180x180.png")
            .is_file());
    }

    #[test]
    fn skips_user_declared_ico() {
        let tmp = project_with(
            "[app]\nname = \"t\"\n[icons.favicon]\nsrc = \"assets/icon.png\"\n\
             [[links]]\nrel = \"shortcut icon\"\nhref = \"/legacy.ico\"\n",
        );
        let out = tmp.path().join("dist");
        run(&args("favicon", out.clone()), &global(tmp.path())).unwrap();
        assert!(out.join("favicon-48x48.png").is_file());
        assert!(!out.join("favicon.ico").exists());
    }

    #[test]
    fn src_flag_overrides_config() {
        let tmp = project_with("[app]\nname = \"t\"\n");
        let out = tmp.path().join("dist");
        let mut generate = args("chrome-icon", out.clone());
        generate.src = Some(PathBuf::from("assets/icon.png"));
        run(&generate, &global(tmp.path())).unwrap();
        assert!(out.join("pwa/chrome-icon/chrome-icon-512x512.png").is_file());
    }

    #[test]
    fn missing_icon_config_is_an_error() {
        let tmp = project_with("[app]\nname = \"t\"\n");
        let err = run(&args("favicon", tmp.path().join("dist")), &global(tmp.path())).unwrap_err();
        assert!(err.to_string().contains("no icon configured for favicon"));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let tmp = project_with("[app]\nname = \"t\"\n");
        let err = run(&args("banner", tmp.path().join("dist")), &global(tmp.path())).unwrap_err();
        assert!(err.to_string().contains("unknown asset request kind 'banner'"));
    }

    #[test]
    fn manifest_kind_writes_json() {
        let tmp = project_with("[app]\nname = \"Atlas\"\n");
        let out = tmp.path().join("dist");
        run(&args("manifest", out.clone()), &global(tmp.path())).unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(out.join("manifest.json")).unwrap()).unwrap();
        assert_eq!(json["name"], "Atlas");
    }
}
