//! Stock content plugins.

use serde_json::{json, Value};
use std::sync::Arc;
use trellis_model::{ContentPlugin, PluginHooks};

pub const VERSION: &str = "0.0.1";

/// Plain text. The only stock plugin that tolerates inline neighbours.
pub fn text() -> ContentPlugin {
    ContentPlugin::new("text", VERSION)
        .allow_inline_neighbours()
        .with_default_state(json!({ "text": "" }))
}

pub fn image() -> ContentPlugin {
    ContentPlugin::new("image", VERSION).with_default_state(json!({ "src": "" }))
}

pub fn video() -> ContentPlugin {
    ContentPlugin::new("video", VERSION).with_default_state(json!({ "src": "" }))
}

/// Vertical whitespace with a pixel height.
///
/// Older documents stored the height as a string, so the unserialize
/// hook coerces it to a number and the serialize hook writes it back
/// as one.
pub fn spacer() -> ContentPlugin {
    ContentPlugin::new("spacer", VERSION)
        .with_default_state(json!({ "height": 24 }))
        .with_hooks(PluginHooks {
            serialize: Some(Arc::new(normalize_height)),
            unserialize: Some(Arc::new(normalize_height)),
        })
}

pub fn divider() -> ContentPlugin {
    ContentPlugin::new("divider", VERSION)
}

fn normalize_height(state: Value) -> Value {
    let height = match &state["height"] {
        Value::Number(n) => n.as_i64().unwrap_or(24),
        Value::String(s) => s.parse().unwrap_or(24),
        _ => 24,
    };
    json!({ "height": height })
}
