//! `pwa manifest`: manifest icons plus `manifest.json`.

use pwa_common::AssetKind;
use pwa_config::IconSpec;

use crate::project::{print_outputs, write_outputs, Project};
use crate::{GlobalArgs, ManifestArgs};

/// Runs the `pwa manifest` command.
///
/// Renders the manifest icons when a source icon is available and embeds
/// their descriptors in the manifest; without one the manifest has no icons.
pub fn run(args: &ManifestArgs, global: &GlobalArgs) -> anyhow::Result<()> {
    let project = Project::load(global)?;
    let pipeline = project.pipeline();

    let spec = match &args.src {
        Some(src) => Some(IconSpec::new(src)),
        None => project
            .config
            .icons
            .spec_for(AssetKind::ManifestIcon)
            .cloned(),
    };

    let mut outputs = match &spec {
        Some(spec) => pipeline.generate_manifest_icons(spec)?,
        None => {
            tracing::warn!("no manifest icon configured; manifest.json will have no icons");
            Vec::new()
        }
    };
    let icons: Vec<_> = outputs
        .iter()
        .filter_map(|o| o.manifest_icon.clone())
        .collect();
    outputs.push(pipeline.generate_manifest(Some(&project.config), &icons)?);

    let report = write_outputs(&args.out, &outputs, &project.config.links)?;
    if !global.quiet {
        eprintln!(
            "   Wrote manifest.json with {} icon(s) to {}",
            icons.len(),
            args.out.display()
        );
    }
    print_outputs(&report.written, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn global(root: &Path) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(root.to_path_buf()),
        }
    }

    fn args(out: PathBuf) -> ManifestArgs {
        ManifestArgs { out, src: None }
    }

    #[test]
    fn manifest_without_icons() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("pwa.toml"), "[app]\nname = \"Bare\"\n").unwrap();
        let out = tmp.path().join("dist");
        run(&args(out.clone()), &global(tmp.path())).unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(out.join("manifest.json")).unwrap()).unwrap();
        assert_eq!(json["name"], "Bare");
        assert!(json["icons"].as_array().unwrap().is_empty());
    }

    #[test]
    fn manifest_with_generated_icons() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("pwa.toml"),
            "[app]\nname = \"Icons\"\n[web]\npublic_path = \"/app/\"\n\
             [icons.chrome]\nsrc = \"icon.png\"\n",
        )
        .unwrap();
        image::RgbaImage::from_pixel(8, 8, image::Rgba([1, 2, 3, 255]))
            .save(tmp.path().join("icon.png"))
            .unwrap();

        let out = tmp.path().join("dist");
        run(&args(out.clone()), &global(tmp.path())).unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(out.join("manifest.json")).unwrap()).unwrap();
        let icons = json["icons"].as_array().unwrap();
        assert_eq!(icons.len(), 3);
        assert_eq!(icons[0]["src"], "/app/pwa/chrome-icon/chrome-icon-144x144.png");
        assert!(out.join("pwa/chrome-icon/chrome-icon-192x192.png").is_file());
    }
}
