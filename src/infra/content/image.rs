//! Image URL construction for store-hosted assets.
//!
//! Asset references encode the original dimensions and format
//! (`image-{id}-{WxH}-{format}`); the CDN serves crops of them at requested
//! sizes. When a reference cannot be parsed the expanded asset URL, if the
//! query projected one, is used untransformed.

use crate::{
    application::render::ImageUrlResolver,
    config::ContentStoreSettings,
    domain::content::ImageAsset,
};

pub struct SanityImageUrls {
    project_id: String,
    dataset: String,
}

impl SanityImageUrls {
    pub fn new(settings: &ContentStoreSettings) -> Self {
        Self {
            project_id: settings.project_id.clone(),
            dataset: settings.dataset.clone(),
        }
    }
}

impl ImageUrlResolver for SanityImageUrls {
    fn image_url(&self, asset: &ImageAsset, width: u32, height: u32) -> Option<String> {
        let reference = asset.id.as_deref().or(asset.reference.as_deref());
        if let Some(reference) = reference
            && let Some(parsed) = parse_image_reference(reference)
        {
            return Some(format!(
                "https://cdn.sanity.io/images/{project}/{dataset}/{id}-{dimensions}.{format}?w={width}&h={height}&fit=crop",
                project = self.project_id,
                dataset = self.dataset,
                id = parsed.id,
                dimensions = parsed.dimensions,
                format = parsed.format,
            ));
        }

        asset.url.clone()
    }
}

struct ParsedReference<'a> {
    id: &'a str,
    dimensions: &'a str,
    format: &'a str,
}

fn parse_image_reference(reference: &str) -> Option<ParsedReference<'_>> {
    let rest = reference.strip_prefix("image-")?;
    let (rest, format) = rest.rsplit_once('-')?;
    let (id, dimensions) = rest.rsplit_once('-')?;

    let (width, height) = dimensions.split_once('x')?;
    if id.is_empty()
        || format.is_empty()
        || width.parse::<u32>().is_err()
        || height.parse::<u32>().is_err()
    {
        return None;
    }

    Some(ParsedReference {
        id,
        dimensions,
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> SanityImageUrls {
        SanityImageUrls {
            project_id: "abc123".to_string(),
            dataset: "production".to_string(),
        }
    }

    #[test]
    fn reference_builds_a_cdn_crop_url() {
        let asset = ImageAsset {
            id: Some("image-deadbeef-1600x900-jpg".to_string()),
            reference: None,
            url: None,
        };
        assert_eq!(
            urls().image_url(&asset, 800, 600).as_deref(),
            Some(
                "https://cdn.sanity.io/images/abc123/production/deadbeef-1600x900.jpg?w=800&h=600&fit=crop"
            )
        );
    }

    #[test]
    fn unparsable_reference_falls_back_to_expanded_url() {
        let asset = ImageAsset {
            id: Some("file-deadbeef-pdf".to_string()),
            reference: None,
            url: Some("https://cdn.example.com/raw.jpg".to_string()),
        };
        assert_eq!(
            urls().image_url(&asset, 800, 600).as_deref(),
            Some("https://cdn.example.com/raw.jpg")
        );
    }

    #[test]
    fn asset_with_nothing_usable_yields_none() {
        let asset = ImageAsset::default();
        assert_eq!(urls().image_url(&asset, 800, 600), None);
    }

    #[test]
    fn malformed_dimensions_are_rejected() {
        assert!(parse_image_reference("image-id-oops-jpg").is_none());
        assert!(parse_image_reference("image--800x600-jpg").is_none());
        assert!(parse_image_reference("not-a-reference").is_none());
    }
}
