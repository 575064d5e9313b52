//! Generated files and the references a web page needs to use them.

use pwa_config::LinkSpec;
use serde::Serialize;

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetOutput {
    /// Encoded file contents.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Path relative to the output directory, always `/`-separated.
    pub relative_path: String,
    /// `<link>` tag to splice into the document head, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_tag: Option<HtmlTag>,
    /// Entry for the web-app manifest `icons` array, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_icon: Option<ManifestIcon>,
}

/// An HTML element referencing an output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlTag {
    /// Element name; always `link`.
    pub tag_name: String,
    /// Element attributes.
    pub attributes: LinkAttributes,
}

/// Attributes of a generated `<link>` tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkAttributes {
    /// Link relation.
    pub rel: String,
    /// Public URL of the output.
    pub href: String,
    /// Media query, for splash screens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    /// Icon size as `{w}x{h}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,
    /// MIME type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// A web-app manifest icon descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestIcon {
    /// Public URL of the icon.
    pub src: String,
    /// Icon size as `{w}x{h}`.
    pub sizes: String,
    /// MIME type.
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl HtmlTag {
    /// A `<link>` tag with the given attributes.
    pub fn link(attributes: LinkAttributes) -> Self {
        Self {
            tag_name: "link".to_string(),
            attributes,
        }
    }

    /// Serializes the tag as HTML, attributes in a fixed order.
    pub fn to_html(&self) -> String {
        let a = &self.attributes;
        let mut html = format!("<{} rel=\"{}\"", self.tag_name, escape(&a.rel));
        for (name, value) in [
            ("type", &a.mime_type),
            ("sizes", &a.sizes),
            ("media", &a.media),
        ] {
            if let Some(value) = value {
                html.push_str(&format!(" {name}=\"{}\"", escape(value)));
            }
        }
        html.push_str(&format!(" href=\"{}\">", escape(&a.href)));
        html
    }
}

impl AssetOutput {
    /// Returns `true` if one of `links` already declares what this output's
    /// tag would declare.
    ///
    /// A link matches when it shares a `rel` token with the tag, has the same
    /// `sizes` (both absent counts as equal) and, for tags with a media
    /// query, the same `media`. Outputs without a tag are never declared.
    pub fn is_declared_by(&self, links: &[LinkSpec]) -> bool {
        let Some(tag) = &self.html_tag else {
            return false;
        };
        let attrs = &tag.attributes;
        links.iter().any(|link| {
            attrs.rel.split_whitespace().any(|rel| link.has_rel(rel))
                && link.sizes == attrs.sizes
                && (attrs.media.is_none() || link.media == attrs.media)
        })
    }
}

/// Joins a public path and a relative file path with exactly one `/`.
pub(crate) fn public_url(public_path: &str, relative: &str) -> String {
    if public_path.is_empty() {
        return relative.to_string();
    }
    format!(
        "{}/{}",
        public_path.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon_output(rel: &str, sizes: Option<&str>) -> AssetOutput {
        AssetOutput {
            bytes: Vec::new(),
            relative_path: "favicon.png".into(),
            html_tag: Some(HtmlTag::link(LinkAttributes {
                rel: rel.into(),
                href: "/favicon.png".into(),
                sizes: sizes.map(str::to_string),
                ..Default::default()
            })),
            manifest_icon: None,
        }
    }

    fn link(rel: &str, sizes: Option<&str>) -> LinkSpec {
        LinkSpec {
            rel: Some(rel.into()),
            sizes: sizes.map(str::to_string),
            href: Some("/custom.png".into()),
            media: None,
        }
    }

    #[test]
    fn public_url_joins_with_single_slash() {
        assert_eq!(public_url("/", "favicon.ico"), "/favicon.ico");
        assert_eq!(public_url("/static/", "/pwa/a.png"), "/static/pwa/a.png");
        assert_eq!(public_url("/static", "pwa/a.png"), "/static/pwa/a.png");
        assert_eq!(public_url("https://cdn.test/app/", "a.png"), "https://cdn.test/app/a.png");
        assert_eq!(public_url("", "a.png"), "a.png");
    }

    #[test]
    fn html_renders_attributes_in_order() {
        let tag = HtmlTag::link(LinkAttributes {
            rel: "icon".into(),
            href: "/favicon-16x16.png".into(),
            sizes: Some("16x16".into()),
            mime_type: Some("image/png".into()),
            media: None,
        });
        assert_eq!(
            tag.to_html(),
            r#"<link rel="icon" type="image/png" sizes="16x16" href="/favicon-16x16.png">"#
        );
    }

    #[test]
    fn html_escapes_quotes() {
        let tag = HtmlTag::link(LinkAttributes {
            rel: "manifest".into(),
            href: "/a\"b.json".into(),
            ..Default::default()
        });
        assert_eq!(tag.to_html(), r#"<link rel="manifest" href="/a&quot;b.json">"#);
    }

    #[test]
    fn json_uses_type_key_and_skips_bytes() {
        let mut out = icon_output("icon", Some("32x32"));
        out.bytes = vec![1, 2, 3];
        out.html_tag.as_mut().unwrap().attributes.mime_type = Some("image/png".into());
        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("bytes").is_none());
        assert!(json.get("manifest_icon").is_none());
        assert_eq!(json["html_tag"]["attributes"]["type"], "image/png");
        assert_eq!(json["html_tag"]["tag_name"], "link");
    }

    #[test]
    fn declared_by_matching_sizes() {
        let out = icon_output("icon", Some("32x32"));
        assert!(out.is_declared_by(&[link("icon", Some("32x32"))]));
        assert!(!out.is_declared_by(&[link("icon", Some("16x16"))]));
        assert!(!out.is_declared_by(&[link("apple-touch-icon", Some("32x32"))]));
    }

    #[test]
    fn shortcut_link_only_covers_unsized_ico() {
        let ico = icon_output("shortcut icon", None);
        let png = icon_output("icon", Some("16x16"));
        let links = [link("shortcut icon", None)];
        assert!(ico.is_declared_by(&links));
        assert!(!png.is_declared_by(&links));
    }

    #[test]
    fn media_must_match_for_splash() {
        let mut out = icon_output("apple-touch-startup-image", None);
        out.html_tag.as_mut().unwrap().attributes.media = Some("(orientation: portrait)".into());
        let mut user = link("apple-touch-startup-image", None);
        assert!(!out.is_declared_by(std::slice::from_ref(&user)));
        user.media = Some("(orientation: portrait)".into());
        assert!(out.is_declared_by(&[user]));
    }

    #[test]
    fn untagged_output_never_declared() {
        let out = AssetOutput {
            bytes: Vec::new(),
            relative_path: "pwa/chrome-icon/chrome-icon-192x192.png".into(),
            html_tag: None,
            manifest_icon: None,
        };
        assert!(!out.is_declared_by(&[link("icon", None)]));
    }
}
