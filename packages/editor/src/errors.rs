//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Plugin error: {0}")]
    Plugin(#[from] trellis_model::PluginError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Selector error: {0}")]
    Selector(#[from] crate::selector::SelectorError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Another drag gesture is already active")]
    DragInProgress,
}
