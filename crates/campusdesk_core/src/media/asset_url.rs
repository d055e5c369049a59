//! Asset identifier recovery from delivery URLs.
//!
//! Delivery URLs look like
//! `https://res.cloudinary.com/{cloud}/{kind}/upload/[transforms/][v123/]{public_id}[.ext]`.
//! Records that only stored the URL (faculty photos, notice PDFs) rely on this
//! to destroy the old asset when it is replaced or deleted.

use crate::media::ResourceKind;
use once_cell::sync::Lazy;
use regex::Regex;

static VERSION_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^v\d+$").expect("valid version segment regex"));

/// Asset handle recovered from a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub public_id: String,
    pub kind: ResourceKind,
}

/// Recovers `(public_id, kind)` from a delivery URL.
///
/// Rules:
/// - The path must contain `{image|raw}/upload/`; anything else yields `None`.
/// - Segments up to and including a `v<digits>` version segment are dropped;
///   without a version segment every segment after `upload/` is kept.
/// - Image ids lose their file extension; raw ids keep it.
pub fn asset_from_url(url: &str) -> Option<AssetRef> {
    let without_scheme = url
        .trim()
        .strip_prefix("https://")
        .or_else(|| url.trim().strip_prefix("http://"))?;
    let path = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let upload_at = segments.iter().position(|segment| *segment == "upload")?;
    let kind = match segments.get(upload_at.checked_sub(1)?)? {
        &"image" => ResourceKind::Image,
        &"raw" => ResourceKind::Raw,
        _ => return None,
    };

    let rest = &segments[upload_at + 1..];
    let id_segments = match rest
        .iter()
        .position(|segment| VERSION_SEGMENT_RE.is_match(segment))
    {
        Some(version_at) => &rest[version_at + 1..],
        None => rest,
    };
    if id_segments.is_empty() {
        return None;
    }

    let mut public_id = id_segments.join("/");
    if kind == ResourceKind::Image {
        strip_extension(&mut public_id);
    }
    if public_id.is_empty() {
        return None;
    }

    Some(AssetRef { public_id, kind })
}

fn strip_extension(public_id: &mut String) {
    let last_segment_start = public_id.rfind('/').map_or(0, |index| index + 1);
    if let Some(dot) = public_id[last_segment_start..].rfind('.') {
        if dot > 0 {
            public_id.truncate(last_segment_start + dot);
        }
    }
}
