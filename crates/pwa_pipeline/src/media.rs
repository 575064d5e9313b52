//! CSS media queries that select a splash image.

use crate::devices::Orientation;

/// Builds the media query matching a device shown in `orientation`.
///
/// `device_width` and `device_height` are the device's physical portrait
/// pixels. Browsers report `device-width`/`device-height` in CSS pixels and do
/// not swap them on rotation, so both orientations of a device get the same
/// dimension terms (physical size divided by `scale`) and differ only in the
/// orientation term. The image itself is rendered at the swapped size for
/// landscape; see [`Orientation::rendered_size`].
///
/// CSS pixels are rounded down when a dimension is not a multiple of `scale`.
/// A `scale` of zero is treated as 1.
pub fn selector_for(
    device_width: u32,
    device_height: u32,
    scale: u32,
    orientation: Orientation,
) -> String {
    let scale = scale.max(1);
    format!(
        "screen and (device-width: {}px) and (device-height: {}px) and \
         (-webkit-device-pixel-ratio: {}) and (orientation: {})",
        device_width / scale,
        device_height / scale,
        scale,
        orientation.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portrait_selector() {
        assert_eq!(
            selector_for(750, 1334, 2, Orientation::Portrait),
            "screen and (device-width: 375px) and (device-height: 667px) and \
             (-webkit-device-pixel-ratio: 2) and (orientation: portrait)"
        );
    }

    #[test]
    fn landscape_keeps_physical_dimensions_unswapped() {
        let portrait = selector_for(750, 1334, 2, Orientation::Portrait);
        let landscape = selector_for(750, 1334, 2, Orientation::Landscape);
        assert!(landscape.contains("(device-width: 375px)"));
        assert!(landscape.contains("(device-height: 667px)"));
        assert!(landscape.ends_with("(orientation: landscape)"));
        assert_eq!(
            portrait.replace("portrait", "landscape"),
            landscape,
            "only the orientation term may differ"
        );
    }

    #[test]
    fn uneven_dimensions_round_down() {
        let q = selector_for(1081, 1921, 3, Orientation::Portrait);
        assert!(q.contains("(device-width: 360px)"));
        assert!(q.contains("(device-height: 640px)"));
    }

    #[test]
    fn zero_scale_is_treated_as_one() {
        let q = selector_for(320, 480, 0, Orientation::Portrait);
        assert!(q.contains("(device-width: 320px)"));
        assert!(q.contains("(-webkit-device-pixel-ratio: 1)"));
    }

    #[test]
    fn scale_three() {
        let q = selector_for(1242, 2688, 3, Orientation::Portrait);
        assert!(q.contains("(device-width: 414px)"));
        assert!(q.contains("(device-height: 896px)"));
        assert!(q.contains("(-webkit-device-pixel-ratio: 3)"));
    }
}
