//! # Drag-and-Drop Engine
//!
//! Evaluates hover feedback during a drag gesture and commits the tree
//! mutation on drop.
//!
//! A gesture walks through `Idle → Dragging → hovering → dropped or
//! cancelled`. Hover evaluation runs on every pointer move, so it is
//! throttled (leading edge only) and must never mutate the tree; the
//! drop evaluation is authoritative, never throttled, and re-validates
//! every guard before committing. Self-drops, drops onto one's own
//! descendants and targets without ids cancel the gesture without any
//! partial mutation.
//!
//! One engine carries at most one active gesture; throttled hover
//! evaluations that fire after the gesture ended observe the cleared
//! state and no-op.

use std::time::{Duration, Instant};

use trellis_model::tree::{Cell, Editable};
use trellis_model::{NativeItem, PluginRegistry};

use crate::content::{hydrate_cell, unserialize_cell};
use crate::errors::EditorError;
use crate::mutations::Mutation;
use crate::placement::{Bounds, GridPolicy, Placement, PlacementPolicy, Point};

/// Synthetic drag id for payloads that do not come from the tree.
/// Never collides with generated node ids.
pub const NATIVE_DRAG_ID: &str = "native-drag";

const HOVER_THROTTLE: Duration = Duration::from_millis(200);

/// What is being dragged.
#[derive(Debug, Clone, PartialEq)]
pub enum DragItem {
    /// An existing cell of the tree, by id.
    Cell { id: String },
    /// A payload from outside the tree, e.g. a dropped URL.
    Native(NativeItem),
}

impl DragItem {
    fn drag_id(&self) -> &str {
        match self {
            DragItem::Cell { id } => id,
            DragItem::Native(_) => NATIVE_DRAG_ID,
        }
    }
}

/// Outcome of one hover evaluation. Purely visual: the caller renders
/// feedback, the tree is untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum HoverStatus {
    /// Valid hover position; show the resolved placement.
    Feedback {
        target_id: String,
        placement: Placement,
    },
    /// Feedback for this target must be cleared (self or descendant hover).
    Cleared,
    /// Same (hover, drag) pair as last time; feedback already cleared.
    Unchanged,
    /// A nested drop target will handle this position.
    Deferred,
    /// Rate limit hit; evaluation skipped.
    Throttled,
    /// No gesture is active (e.g. a throttled evaluation fired late).
    Inactive,
    /// Target had no usable id.
    InvalidTarget,
    /// The gesture was cancelled (native payload without a handler).
    Cancelled,
}

/// Outcome of a drop evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// The tree was mutated.
    Committed {
        cell_id: String,
        placement: Placement,
    },
    /// Another (deeper) target owns this drop, or no gesture is active.
    Ignored,
    /// The gesture was cancelled without mutation.
    Cancelled,
}

/// Leading-edge rate limiter for hover evaluation.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// True when a new evaluation may run now.
    pub fn ready(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(previous) if now.duration_since(previous) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Drag gesture state machine.
pub struct DndEngine {
    policy: Box<dyn PlacementPolicy>,
    throttle: Throttle,
    active: Option<DragItem>,
    /// Last (hover, drag) pair processed; dedups feedback clearing
    /// under throttling. Scoped to the active gesture.
    last: Option<(String, String)>,
}

impl Default for DndEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DndEngine {
    pub fn new() -> Self {
        Self {
            policy: Box::new(GridPolicy::default()),
            throttle: Throttle::new(HOVER_THROTTLE),
            active: None,
            last: None,
        }
    }

    pub fn with_policy(mut self, policy: Box<dyn PlacementPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_throttle(mut self, interval: Duration) -> Self {
        self.throttle = Throttle::new(interval);
        self
    }

    /// Begin a gesture. Only one gesture may be active at a time.
    pub fn begin_drag(&mut self, item: DragItem) -> Result<(), EditorError> {
        if self.active.is_some() {
            return Err(EditorError::DragInProgress);
        }
        self.active = Some(item);
        self.last = None;
        Ok(())
    }

    /// Abort the gesture; late hover evaluations become no-ops.
    pub fn cancel(&mut self) {
        self.active = None;
        self.last = None;
    }

    pub fn active(&self) -> Option<&DragItem> {
        self.active.as_ref()
    }

    /// Evaluate a hover event over `target_id`.
    ///
    /// `shallow` is false when the pointer is actually over a nested
    /// drop target inside this one, in which case the deeper target
    /// owns the evaluation.
    pub fn hover(
        &mut self,
        editable: &Editable,
        registry: &PluginRegistry,
        target_id: &str,
        pointer: Point,
        bounds: Bounds,
        shallow: bool,
    ) -> HoverStatus {
        if !self.throttle.ready() {
            return HoverStatus::Throttled;
        }

        if let Some(DragItem::Native(_)) = &self.active {
            if registry.native_handler().is_none() {
                tracing::warn!(
                    "caught a native drag event, but no native handler is registered; \
                     cancelling the gesture"
                );
                self.cancel();
                return HoverStatus::Cancelled;
            }
        }

        let Some(drag) = &self.active else {
            // Throttled evaluation fired after the gesture ended.
            return HoverStatus::Inactive;
        };
        let drag_id = drag.drag_id().to_string();

        if drag_id == target_id {
            return self.clear_once(target_id, &drag_id);
        }
        if !shallow {
            // A deeper target will evaluate this position.
            return HoverStatus::Deferred;
        }

        let Some(target) = (!target_id.is_empty())
            .then(|| editable.find_cell(target_id))
            .flatten()
        else {
            tracing::warn!(target_id, "cancelled cell hover, no such target");
            return HoverStatus::InvalidTarget;
        };

        if target.ancestors.iter().any(|a| a == &drag_id) {
            // Hovering over one's own descendant.
            return self.clear_once(target_id, &drag_id);
        }

        self.last = Some((target_id.to_string(), drag_id));
        let placement = self
            .policy
            .resolve(pointer, bounds, allow_inline_neighbours(target));
        HoverStatus::Feedback {
            target_id: target_id.to_string(),
            placement,
        }
    }

    /// Evaluate a drop over `target_id` and commit the mutation.
    ///
    /// Never throttled: this is the authoritative evaluation of the
    /// gesture. `already_handled` is true when a deeper nested target
    /// committed this drop first.
    #[allow(clippy::too_many_arguments)]
    pub fn drop(
        &mut self,
        editable: &mut Editable,
        registry: &PluginRegistry,
        target_id: &str,
        pointer: Point,
        bounds: Bounds,
        shallow: bool,
        already_handled: bool,
    ) -> Result<DropOutcome, EditorError> {
        if already_handled || !shallow {
            // The owning target keeps the gesture.
            return Ok(DropOutcome::Ignored);
        }

        let Some(item) = self.active.clone() else {
            return Ok(DropOutcome::Ignored);
        };

        match item {
            DragItem::Native(native) => {
                let Some(handler) = registry.native_handler() else {
                    tracing::warn!(
                        "caught a native drop event, but no native handler is registered; \
                         cancelling the gesture"
                    );
                    self.cancel();
                    return Ok(DropOutcome::Cancelled);
                };

                let mut cell = handler(&native);
                hydrate_cell(&mut cell);
                if let Err(err) = unserialize_cell(&mut cell, registry) {
                    self.cancel();
                    return Err(err.into());
                }

                let Some(target) = editable.find_cell(target_id) else {
                    tracing::warn!(target_id, "cancelled native drop, no such target");
                    self.cancel();
                    return Ok(DropOutcome::Cancelled);
                };
                let placement =
                    self.policy
                        .resolve(pointer, bounds, allow_inline_neighbours(target));

                let cell_id = cell.id.clone();
                let result = Mutation::InsertCell {
                    cell,
                    target_id: target_id.to_string(),
                    placement,
                }
                .apply(editable);
                self.cancel();
                result?;

                Ok(DropOutcome::Committed { cell_id, placement })
            }

            DragItem::Cell { id: drag_id } => {
                if drag_id == target_id {
                    self.cancel();
                    return Ok(DropOutcome::Cancelled);
                }
                let Some(target) = editable.find_cell(target_id) else {
                    tracing::warn!(target_id, "cancelled cell drop, no such target");
                    self.cancel();
                    return Ok(DropOutcome::Cancelled);
                };
                if target.ancestors.iter().any(|a| a == &drag_id) {
                    // Dropping onto one's own descendant.
                    self.cancel();
                    return Ok(DropOutcome::Cancelled);
                }

                let placement =
                    self.policy
                        .resolve(pointer, bounds, allow_inline_neighbours(target));

                let result = Mutation::MoveCell {
                    cell_id: drag_id.clone(),
                    target_id: target_id.to_string(),
                    placement,
                }
                .apply(editable);
                self.cancel();
                result?;

                Ok(DropOutcome::Committed {
                    cell_id: drag_id,
                    placement,
                })
            }
        }
    }

    /// Clear hover feedback at most once per (hover, drag) pair.
    fn clear_once(&mut self, hover_id: &str, drag_id: &str) -> HoverStatus {
        let pair = (hover_id.to_string(), drag_id.to_string());
        if self.last.as_ref() == Some(&pair) {
            return HoverStatus::Unchanged;
        }
        self.last = Some(pair);
        HoverStatus::Cleared
    }
}

fn allow_inline_neighbours(target: &Cell) -> bool {
    target
        .content
        .as_ref()
        .and_then(|content| content.descriptor.as_ref())
        .map(|descriptor| descriptor.allow_inline_neighbours)
        .unwrap_or(false)
}
