//! `pwa devices`: the splash-screen device matrix.

use pwa_pipeline::{DeviceFilter, DeviceMatrix, OrientationFilter, SplashTarget};
use serde::Serialize;

use crate::{DevicesArgs, GlobalArgs, OrientationArg};

/// One row of the listing.
#[derive(Debug, Serialize)]
struct DeviceRow<'a> {
    device: &'a str,
    orientation: &'static str,
    width: u32,
    height: u32,
    scale: u32,
    media: &'a str,
}

impl<'a> From<&'a SplashTarget<'a>> for DeviceRow<'a> {
    fn from(target: &'a SplashTarget<'a>) -> Self {
        Self {
            device: &target.device.name,
            orientation: target.orientation.as_str(),
            width: target.width,
            height: target.height,
            scale: target.device.scale,
            media: &target.media,
        }
    }
}

/// Runs the `pwa devices` command.
pub fn run(args: &DevicesArgs, _global: &GlobalArgs) -> anyhow::Result<()> {
    let matrix = DeviceMatrix::builtin();
    let targets = matrix.splash_targets(filter(args));
    let rows: Vec<DeviceRow<'_>> = targets.iter().map(DeviceRow::from).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    for row in &rows {
        println!(
            "{:<40} {:<9} {:>4}x{:<4} @{}x  {}",
            row.device, row.orientation, row.width, row.height, row.scale, row.media
        );
    }
    Ok(())
}

fn filter(args: &DevicesArgs) -> DeviceFilter {
    DeviceFilter {
        orientation: match args.orientation {
            OrientationArg::Any => OrientationFilter::Any,
            OrientationArg::Portrait => OrientationFilter::Portrait,
            OrientationArg::Landscape => OrientationFilter::Landscape,
        },
        include_tablets: args.tablets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(orientation: OrientationArg, tablets: bool) -> DevicesArgs {
        DevicesArgs {
            orientation,
            tablets,
            json: false,
        }
    }

    #[test]
    fn filter_maps_flags() {
        let f = filter(&args(OrientationArg::Portrait, true));
        assert_eq!(f.orientation, OrientationFilter::Portrait);
        assert!(f.include_tablets);
    }

    #[test]
    fn landscape_tablet_rows() {
        let matrix = DeviceMatrix::builtin();
        let targets = matrix.splash_targets(filter(&args(OrientationArg::Landscape, true)));
        let rows: Vec<DeviceRow<'_>> = targets.iter().map(DeviceRow::from).collect();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.orientation == "landscape"));
        assert!(rows.iter().all(|r| r.width > r.height));
    }

    #[test]
    fn rows_serialize() {
        let matrix = DeviceMatrix::builtin();
        let targets = matrix.splash_targets(filter(&args(OrientationArg::Portrait, false)));
        let rows: Vec<DeviceRow<'_>> = targets.iter().map(DeviceRow::from).collect();
        let json = serde_json::to_value(&rows).unwrap();
        assert_eq!(json[0]["device"], "iPhone SE");
        assert_eq!(json[0]["width"], 640);
        assert_eq!(json[0]["height"], 1136);
    }
}
