//! Native drop handling.
//!
//! Browsers hand us non-tree drag payloads (URLs dragged from another
//! tab, images dragged from the desktop). The native handler converts
//! such a payload into a serialized cell so the drop pipeline can
//! treat it like any other insertion.

use serde_json::json;
use std::sync::Arc;
use trellis_model::tree::{Cell, Content, PluginRef};
use trellis_model::{NativeHandler, NativeItem};

const IMAGE_EXTENSIONS: [&str; 5] = [".png", ".jpg", ".jpeg", ".gif", ".webp"];

/// Wrap a dropped URL: an image cell when the URL looks like an image,
/// otherwise a text cell carrying the link.
pub fn url_handler() -> NativeHandler {
    Arc::new(|item: &NativeItem| {
        let url = item.data.as_str().unwrap_or_default();
        if looks_like_image(url) {
            Cell {
                content: Some(Content::new(
                    PluginRef::any("image"),
                    json!({ "src": url }),
                )),
                ..Cell::default()
            }
        } else {
            Cell {
                content: Some(Content::new(
                    PluginRef::any("text"),
                    json!({ "text": url, "href": url }),
                )),
                ..Cell::default()
            }
        }
    })
}

fn looks_like_image(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    let path = lower.split(['?', '#']).next().unwrap_or(&lower);
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_model::NATIVE_TYPE_URL;

    fn item(url: &str) -> NativeItem {
        NativeItem {
            item_type: NATIVE_TYPE_URL.to_string(),
            data: json!(url),
        }
    }

    #[test]
    fn test_image_urls_become_image_cells() {
        let cell = url_handler()(&item("https://example.com/photo.JPG?w=600"));
        let content = cell.content.unwrap();
        assert_eq!(content.plugin.name, "image");
        assert_eq!(content.state["src"], "https://example.com/photo.JPG?w=600");
    }

    #[test]
    fn test_other_urls_become_text_links() {
        let cell = url_handler()(&item("https://example.com/article"));
        let content = cell.content.unwrap();
        assert_eq!(content.plugin.name, "text");
        assert_eq!(content.state["href"], "https://example.com/article");
    }
}
