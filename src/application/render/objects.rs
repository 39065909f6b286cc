//! Embedded-object rendering: images, video embeds and file attachments.
//!
//! Each kind has its own sub-dispatch: video URLs are sniffed for known
//! platform markers, files for their extension. A node missing its required
//! reference renders nothing at all — the surrounding section is unaffected.

use tracing::debug;

use crate::domain::content::{FileNode, ImageNode, VideoEmbedNode};

use super::types::{
    IMAGE_HEIGHT, IMAGE_WIDTH, ImageUrlResolver, RenderedBlock, VideoPlayer,
};

/// Extensions served through the native inline video element.
const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "webm", "mov", "avi", "mkv"];

/// Render an image reference. `None` when the asset is absent.
pub fn render_image(node: &ImageNode, images: &dyn ImageUrlResolver) -> Option<RenderedBlock> {
    let asset = node.asset.as_ref()?;
    let Some(src) = images.image_url(asset, IMAGE_WIDTH, IMAGE_HEIGHT) else {
        debug!(
            target = "application::render",
            "image asset resolved to no URL; skipping node"
        );
        return None;
    };

    Some(RenderedBlock::Image {
        src,
        alt: node
            .alt
            .clone()
            .filter(|alt| !alt.trim().is_empty())
            .unwrap_or_else(|| "Blog image".to_string()),
        caption: node.caption.clone(),
    })
}

/// Render a video embed. `None` when the URL is absent.
pub fn render_video(node: &VideoEmbedNode) -> Option<RenderedBlock> {
    let url = node.url.as_deref()?;

    let player = if url.contains("youtube.com") || url.contains("youtu.be") {
        match youtube_video_id(url) {
            Some(id) => VideoPlayer::YouTube { id: id.to_string() },
            // No extractable identifier: fall through to the generic player.
            None => VideoPlayer::Direct {
                url: url.to_string(),
            },
        }
    } else if url.contains("vimeo.com") {
        match vimeo_video_id(url) {
            Some(id) => VideoPlayer::Vimeo { id: id.to_string() },
            None => VideoPlayer::Direct {
                url: url.to_string(),
            },
        }
    } else {
        VideoPlayer::Direct {
            url: url.to_string(),
        }
    };

    Some(RenderedBlock::Video {
        player,
        title: node.title.clone(),
        caption: node.caption.clone(),
    })
}

/// Render a file attachment. `None` when the asset or its URL is absent.
///
/// GIFs render as images without re-encoding so animation survives; common
/// video containers render inline; everything else becomes a download card.
pub fn render_file(node: &FileNode) -> Option<RenderedBlock> {
    let asset = node.asset.as_ref()?;
    let url = asset.url.clone()?;

    let extension = asset
        .extension
        .as_deref()
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let label = node
        .title
        .clone()
        .or_else(|| asset.original_filename.clone())
        .unwrap_or_else(|| "File".to_string());

    if extension == "gif" {
        return Some(RenderedBlock::Image {
            src: url,
            alt: label,
            caption: node.description.clone(),
        });
    }

    if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        return Some(RenderedBlock::Video {
            player: VideoPlayer::Direct { url },
            title: Some(label),
            caption: node.description.clone(),
        });
    }

    Some(RenderedBlock::Download {
        href: url,
        label,
        description: node.description.clone(),
    })
}

/// Extract a YouTube video identifier: the `v=` query value up to the next
/// `&`, or the path segment after `youtu.be/` up to the next `?`.
fn youtube_video_id(url: &str) -> Option<&str> {
    if let Some((_, rest)) = url.split_once("v=") {
        let id = rest.split('&').next().unwrap_or(rest);
        return (!id.is_empty()).then_some(id);
    }
    if let Some((_, rest)) = url.split_once("youtu.be/") {
        let id = rest.split('?').next().unwrap_or(rest);
        return (!id.is_empty()).then_some(id);
    }
    None
}

/// Extract a Vimeo video identifier: the path segment after `vimeo.com/`
/// up to the next `?`.
fn vimeo_video_id(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("vimeo.com/")?;
    let id = rest.split('?').next().unwrap_or(rest);
    (!id.is_empty()).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::{FileAsset, ImageAsset};

    struct FixedUrls;

    impl ImageUrlResolver for FixedUrls {
        fn image_url(&self, asset: &ImageAsset, width: u32, height: u32) -> Option<String> {
            asset
                .url
                .as_ref()
                .map(|url| format!("{url}?w={width}&h={height}"))
        }
    }

    fn file_node(extension: &str) -> FileNode {
        FileNode {
            asset: Some(FileAsset {
                url: Some(format!("https://cdn.example.com/file.{extension}")),
                original_filename: Some(format!("file.{extension}")),
                extension: Some(extension.to_string()),
            }),
            title: None,
            description: None,
        }
    }

    #[test]
    fn image_without_asset_renders_nothing() {
        let node = ImageNode::default();
        assert_eq!(render_image(&node, &FixedUrls), None);
    }

    #[test]
    fn image_alt_falls_back_to_generic_label() {
        let node = ImageNode {
            asset: Some(ImageAsset {
                url: Some("https://cdn.example.com/pic.jpg".to_string()),
                ..ImageAsset::default()
            }),
            alt: None,
            caption: Some("a caption".to_string()),
        };
        let Some(RenderedBlock::Image { alt, caption, .. }) = render_image(&node, &FixedUrls)
        else {
            panic!("expected image");
        };
        assert_eq!(alt, "Blog image");
        assert_eq!(caption.as_deref(), Some("a caption"));
    }

    #[test]
    fn short_link_youtube_id_stops_at_query() {
        assert_eq!(
            youtube_video_id("https://youtu.be/abc123?t=5"),
            Some("abc123")
        );
    }

    #[test]
    fn watch_url_youtube_id_stops_at_ampersand() {
        assert_eq!(
            youtube_video_id("https://youtube.com/watch?v=xyz&t=5"),
            Some("xyz")
        );
    }

    #[test]
    fn vimeo_id_stops_at_query() {
        assert_eq!(
            vimeo_video_id("https://vimeo.com/76979871?autoplay=1"),
            Some("76979871")
        );
    }

    #[test]
    fn unknown_host_falls_back_to_direct_player() {
        let node = VideoEmbedNode {
            url: Some("https://example.com/movie.mp4".to_string()),
            ..VideoEmbedNode::default()
        };
        let Some(RenderedBlock::Video { player, .. }) = render_video(&node) else {
            panic!("expected video");
        };
        assert_eq!(
            player,
            VideoPlayer::Direct {
                url: "https://example.com/movie.mp4".to_string()
            }
        );
    }

    #[test]
    fn youtube_url_without_id_uses_generic_player() {
        let node = VideoEmbedNode {
            url: Some("https://www.youtube.com/feed/subscriptions".to_string()),
            ..VideoEmbedNode::default()
        };
        let Some(RenderedBlock::Video { player, .. }) = render_video(&node) else {
            panic!("expected video");
        };
        assert!(matches!(player, VideoPlayer::Direct { .. }));
    }

    #[test]
    fn gif_files_render_as_images() {
        let Some(RenderedBlock::Image { src, alt, .. }) = render_file(&file_node("gif")) else {
            panic!("expected image");
        };
        assert!(src.ends_with("file.gif"));
        assert_eq!(alt, "file.gif");
    }

    #[test]
    fn video_container_files_render_inline() {
        for extension in VIDEO_EXTENSIONS {
            let Some(RenderedBlock::Video { player, .. }) = render_file(&file_node(extension))
            else {
                panic!("expected video for {extension}");
            };
            assert!(matches!(player, VideoPlayer::Direct { .. }));
        }
    }

    #[test]
    fn other_files_become_download_cards_with_fallback_label() {
        let Some(RenderedBlock::Download { label, .. }) = render_file(&file_node("pdf")) else {
            panic!("expected download card");
        };
        assert_eq!(label, "file.pdf");
    }

    #[test]
    fn explicit_title_wins_over_original_filename() {
        let mut node = file_node("pdf");
        node.title = Some("Quarterly Report".to_string());
        let Some(RenderedBlock::Download { label, .. }) = render_file(&node) else {
            panic!("expected download card");
        };
        assert_eq!(label, "Quarterly Report");
    }

    #[test]
    fn file_without_asset_renders_nothing() {
        let node = FileNode {
            asset: None,
            title: Some("Ghost".to_string()),
            description: None,
        };
        assert_eq!(render_file(&node), None);
    }

    #[test]
    fn extension_case_is_ignored() {
        let mut node = file_node("gif");
        if let Some(asset) = node.asset.as_mut() {
            asset.extension = Some("GIF".to_string());
        }
        assert!(matches!(
            render_file(&node),
            Some(RenderedBlock::Image { .. })
        ));
    }
}
