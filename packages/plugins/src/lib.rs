//! # Trellis Plugins
//!
//! Stock plugin descriptors: the content and layout plugins every
//! deployment starts from, plus the native handler that turns dropped
//! URLs into real cells. Rendering lives with the host; these
//! descriptors only define identity, state shape and serialization
//! hooks.

pub mod content;
pub mod layout;
pub mod native;

use trellis_model::PluginRegistry;

/// Register the full stock set on a registry.
pub fn register_defaults(registry: &mut PluginRegistry) {
    registry.register_content_plugin(content::text());
    registry.register_content_plugin(content::image());
    registry.register_content_plugin(content::video());
    registry.register_content_plugin(content::spacer());
    registry.register_content_plugin(content::divider());
    registry.register_layout_plugin(layout::container());
    registry.register_layout_plugin(layout::grid());
    registry.register_native_handler(native::url_handler());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_the_stock_set() {
        let mut registry = PluginRegistry::new();
        register_defaults(&mut registry);

        for name in ["text", "image", "video", "spacer", "divider"] {
            assert!(registry.resolve_content_plugin(name, "*").is_ok(), "{name}");
        }
        for name in ["container", "grid"] {
            assert!(registry.resolve_layout_plugin(name, "*").is_ok(), "{name}");
        }
        assert!(registry.native_handler().is_some());
    }
}
