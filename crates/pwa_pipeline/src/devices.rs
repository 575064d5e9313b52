//! Catalog of splash-screen target devices.
//!
//! Splash images are selected by the browser through CSS media queries, one
//! per device and orientation. The catalog order is part of the contract:
//! it fixes the order of generated outputs and therefore of the HTML tags.

use std::fmt;

use crate::media::selector_for;

/// A concrete screen orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Taller than wide.
    Portrait,
    /// Wider than tall.
    Landscape,
}

impl Orientation {
    /// Both orientations, portrait first.
    pub const BOTH: [Orientation; 2] = [Orientation::Portrait, Orientation::Landscape];

    /// Size of the image rendered for a device of `width` x `height`
    /// physical pixels (portrait-native) shown in this orientation.
    pub fn rendered_size(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            Orientation::Portrait => (width, height),
            Orientation::Landscape => (height, width),
        }
    }

    /// The CSS keyword for this orientation.
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Orientation constraint of a device query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrientationFilter {
    /// Both orientations.
    #[default]
    Any,
    /// Portrait only.
    Portrait,
    /// Landscape only.
    Landscape,
}

impl OrientationFilter {
    fn allows(self, orientation: Orientation) -> bool {
        match self {
            OrientationFilter::Any => true,
            OrientationFilter::Portrait => orientation == Orientation::Portrait,
            OrientationFilter::Landscape => orientation == Orientation::Landscape,
        }
    }
}

/// Query for [`DeviceMatrix::list_devices`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceFilter {
    /// Which orientations to keep.
    pub orientation: OrientationFilter,
    /// A device is listed only if its tablet flag equals this value.
    pub include_tablets: bool,
}

/// A target device in physical (portrait) pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    /// Human-readable device family name.
    pub name: String,
    /// Physical pixel width in portrait.
    pub width: u32,
    /// Physical pixel height in portrait.
    pub height: u32,
    /// Device pixel ratio. Media queries divide the physical size by it,
    /// rounding down.
    pub scale: u32,
    /// Whether the device is a tablet.
    pub is_tablet: bool,
    /// Orientations splash images are needed for.
    pub orientations: Vec<Orientation>,
}

impl DeviceProfile {
    /// A device that needs both orientations.
    pub fn new(name: &str, width: u32, height: u32, scale: u32, is_tablet: bool) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            scale,
            is_tablet,
            orientations: Orientation::BOTH.to_vec(),
        }
    }
}

/// One listed device with the orientations left after filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEntry<'a> {
    /// The catalog device.
    pub device: &'a DeviceProfile,
    /// Filtered orientations, portrait before landscape.
    pub orientations: Vec<Orientation>,
}

/// One splash image to render: a device in one orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplashTarget<'a> {
    /// The catalog device.
    pub device: &'a DeviceProfile,
    /// The orientation the image is shown in.
    pub orientation: Orientation,
    /// Rendered image width (device height for landscape).
    pub width: u32,
    /// Rendered image height (device width for landscape).
    pub height: u32,
    /// Media query selecting this image.
    pub media: String,
}

/// An ordered catalog of target devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceMatrix {
    devices: Vec<DeviceProfile>,
}

impl DeviceMatrix {
    /// Creates a matrix over a custom catalog, keeping its order.
    pub fn new(devices: Vec<DeviceProfile>) -> Self {
        Self { devices }
    }

    /// The built-in iOS catalog.
    pub fn builtin() -> Self {
        Self::new(vec![
            DeviceProfile::new("iPhone SE", 640, 1136, 2, false),
            DeviceProfile::new("iPhone Xs Max", 1242, 2688, 3, false),
            DeviceProfile::new("iPhone Xr", 828, 1792, 2, false),
            DeviceProfile::new("iPhone X, Xs", 1125, 2436, 3, false),
            DeviceProfile::new("iPhone 8 Plus, 7 Plus, 6s Plus, 6 Plus", 1242, 2208, 3, false),
            DeviceProfile::new("iPhone 8, 7, 6s, 6", 750, 1334, 2, false),
            DeviceProfile::new("iPad Pro 12.9\"", 2048, 2732, 2, true),
            DeviceProfile::new("iPad Pro 11\"", 1668, 2388, 2, true),
            DeviceProfile::new("iPad Pro 10.5\"", 1668, 2224, 2, true),
            DeviceProfile::new("iPad Mini, Air", 1536, 2048, 2, true),
        ])
    }

    /// All devices in catalog order.
    pub fn devices(&self) -> &[DeviceProfile] {
        &self.devices
    }

    /// Lists matching devices in catalog order.
    ///
    /// A device is kept iff its tablet flag equals `filter.include_tablets`
    /// and at least one of its orientations passes `filter.orientation`.
    pub fn list_devices(&self, filter: DeviceFilter) -> Vec<DeviceEntry<'_>> {
        self.devices
            .iter()
            .filter(|device| device.is_tablet == filter.include_tablets)
            .filter_map(|device| {
                let orientations: Vec<Orientation> = Orientation::BOTH
                    .into_iter()
                    .filter(|o| device.orientations.contains(o) && filter.orientation.allows(*o))
                    .collect();
                (!orientations.is_empty()).then_some(DeviceEntry {
                    device,
                    orientations,
                })
            })
            .collect()
    }

    /// Expands matching devices into one target per (device, orientation).
    pub fn splash_targets(&self, filter: DeviceFilter) -> Vec<SplashTarget<'_>> {
        let mut targets = Vec::new();
        for entry in self.list_devices(filter) {
            let device = entry.device;
            for orientation in entry.orientations {
                let (width, height) = orientation.rendered_size(device.width, device.height);
                targets.push(SplashTarget {
                    device,
                    orientation,
                    width,
                    height,
                    media: selector_for(device.width, device.height, device.scale, orientation),
                });
            }
        }
        targets
    }
}

impl Default for DeviceMatrix {
    fn default() -> Self {
        Self::builtin()
    }
}
