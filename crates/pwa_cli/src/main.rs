//! `pwa`: generates the image assets of a progressive web app.
//!
//! Provides `pwa generate <kind>` for favicons, touch icons, manifest icons
//! and splash screens, `pwa manifest` for `manifest.json` with its icons, and
//! `pwa devices` to inspect the splash-screen device matrix.

#![warn(missing_docs)]

mod devices;
mod generate;
mod manifest;
mod project;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Command-line interface of the PWA asset generator.
#[derive(Parser, Debug)]
#[command(name = "pwa", version, about = "PWA image asset generator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `pwa.toml` configuration file or project directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate one asset category (favicon, safari-icon, chrome-icon, splash, manifest).
    Generate(GenerateArgs),
    /// Generate manifest icons and `manifest.json`.
    Manifest(ManifestArgs),
    /// List the splash-screen device matrix.
    Devices(DevicesArgs),
}

/// Arguments for the `pwa generate` subcommand.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Asset kind to generate.
    pub kind: String,

    /// Output directory for generated files.
    #[arg(short, long, default_value = "web-build")]
    pub out: PathBuf,

    /// Source icon, overriding the one configured in `pwa.toml`.
    #[arg(long)]
    pub src: Option<PathBuf>,

    /// Print the generated outputs as JSON instead of HTML tags.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `pwa manifest` subcommand.
#[derive(Parser, Debug)]
pub struct ManifestArgs {
    /// Output directory for generated files.
    #[arg(short, long, default_value = "web-build")]
    pub out: PathBuf,

    /// Source icon for the manifest icons, overriding `pwa.toml`.
    #[arg(long)]
    pub src: Option<PathBuf>,
}

/// Arguments for the `pwa devices` subcommand.
#[derive(Parser, Debug)]
pub struct DevicesArgs {
    /// Orientations to list.
    #[arg(long, value_enum, default_value_t = OrientationArg::Any)]
    pub orientation: OrientationArg,

    /// List tablets instead of phones.
    #[arg(long)]
    pub tablets: bool,

    /// Print the matrix as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Orientation selection for `pwa devices`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OrientationArg {
    /// Both orientations.
    Any,
    /// Portrait only.
    Portrait,
    /// Landscape only.
    Landscape,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file or project directory.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Generate(ref args) => generate::run(args, &global),
        Command::Manifest(ref args) => manifest::run(args, &global),
        Command::Devices(ref args) => devices::run(args, &global),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the flags.
fn init_logging(global: &GlobalArgs) {
    let default = if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_generate_default() {
        let cli = Cli::parse_from(["pwa", "generate", "favicon"]);
        match cli.command {
            Command::Generate(ref args) => {
                assert_eq!(args.kind, "favicon");
                assert_eq!(args.out, PathBuf::from("web-build"));
                assert!(args.src.is_none());
                assert!(!args.json);
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn parse_generate_with_args() {
        let cli = Cli::parse_from([
            "pwa",
            "generate",
            "splash",
            "--out",
            "dist",
            "--src",
            "assets/splash.png",
            "--json",
        ]);
        match cli.command {
            Command::Generate(ref args) => {
                assert_eq!(args.kind, "splash");
                assert_eq!(args.out, PathBuf::from("dist"));
                assert_eq!(args.src, Some(PathBuf::from("assets/splash.png")));
                assert!(args.json);
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn parse_generate_requires_kind() {
        assert!(Cli::try_parse_from(["pwa", "generate"]).is_err());
    }

    #[test]
    fn parse_manifest() {
        let cli = Cli::parse_from(["pwa", "manifest", "-o", "public"]);
        match cli.command {
            Command::Manifest(ref args) => {
                assert_eq!(args.out, PathBuf::from("public"));
                assert!(args.src.is_none());
            }
            _ => panic!("expected Manifest command"),
        }
    }

    #[test]
    fn parse_devices_default() {
        let cli = Cli::parse_from(["pwa", "devices"]);
        match cli.command {
            Command::Devices(ref args) => {
                assert_eq!(args.orientation, OrientationArg::Any);
                assert!(!args.tablets);
            }
            _ => panic!("expected Devices command"),
        }
    }

    #[test]
    fn parse_devices_with_args() {
        let cli = Cli::parse_from(["pwa", "devices", "--orientation", "landscape", "--tablets"]);
        match cli.command {
            Command::Devices(ref args) => {
                assert_eq!(args.orientation, OrientationArg::Landscape);
                assert!(args.tablets);
            }
            _ => panic!("expected Devices command"),
        }
    }

    #[test]
    fn parse_devices_rejects_unknown_orientation() {
        assert!(Cli::try_parse_from(["pwa", "devices", "--orientation", "diagonal"]).is_err());
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["pwa", "--quiet", "--config", "site/pwa.toml", "devices"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("site/pwa.toml")));
    }

    #[test]
    fn parse_verbose_after_subcommand() {
        let cli = Cli::parse_from(["pwa", "generate", "favicon", "--verbose"]);
        assert!(cli.verbose);
    }
}
