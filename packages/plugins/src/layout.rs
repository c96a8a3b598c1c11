//! Stock layout plugins.

use trellis_model::LayoutPlugin;

use crate::content::VERSION;

/// Plain vertical container.
pub fn container() -> LayoutPlugin {
    LayoutPlugin::new("container", VERSION)
}

/// Column grid; cell `size` weights decide the column spans.
pub fn grid() -> LayoutPlugin {
    LayoutPlugin::new("grid", VERSION)
}
