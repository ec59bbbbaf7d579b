//! Mutually exclusive editing modes driven by the two form selectors.
//!
//! The controller holds one authoritative [`InteractionMode`]: at most one
//! gesture handler exists at any time, so draw and modify cannot both be
//! active. The selection set lives inside the modify gesture; entering or
//! leaving modify therefore always starts from an empty selection.

mod draw;
mod modify;

pub use draw::DrawGesture;
pub use modify::ModifyGesture;

use crate::model::{Coord, Feature, FeatureKey, GeometryType};
use crate::source::FeatureSource;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Move,
    Click,
    DoubleClick,
    DragStart,
    Drag,
    DragEnd,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
}

/// Pointer input in map coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub coordinate: Coord,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub const fn new(kind: PointerKind, coordinate: Coord, modifiers: Modifiers) -> Self {
        Self {
            kind,
            coordinate,
            modifiers,
        }
    }
}

/// Completed gestures, applied to the source and forwarded to the service.
#[derive(Debug, Clone, PartialEq)]
pub enum EditEvent {
    /// A sketch was finished; the feature has no id yet.
    DrawEnd(Feature),
    /// A modify gesture finished; every feature in the selection.
    ModifyEnd(Vec<FeatureKey>),
}

/// Value of the interaction selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Draw,
    Modify,
}

impl InteractionKind {
    pub const ALL: [Self; 2] = [Self::Draw, Self::Modify];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Draw => "Draw",
            Self::Modify => "Modify",
        }
    }
}

/// Change events from the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    DrawTypeChanged(GeometryType),
    InteractionChanged(InteractionKind),
}

/// Which handler currently has gesture focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveHandler {
    Draw(GeometryType),
    Modify,
}

#[derive(Debug, Clone, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Draw(DrawGesture),
    Modify(ModifyGesture),
}

#[derive(Debug, Default)]
pub struct PointerOutcome {
    /// The handler used the event; a consumed drag must not pan the map.
    pub consumed: bool,
    pub edit: Option<EditEvent>,
}

impl PointerOutcome {
    pub const fn ignored() -> Self {
        Self {
            consumed: false,
            edit: None,
        }
    }

    pub const fn consumed() -> Self {
        Self {
            consumed: true,
            edit: None,
        }
    }

    pub const fn edit(edit: EditEvent) -> Self {
        Self {
            consumed: true,
            edit: Some(edit),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    draw_type: GeometryType,
    interaction: InteractionKind,
    mode: InteractionMode,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    /// Starts in Draw-Point.
    pub fn new() -> Self {
        let mut controller = Self {
            draw_type: GeometryType::Point,
            interaction: InteractionKind::Draw,
            mode: InteractionMode::Idle,
        };
        controller.activate();
        controller
    }

    pub const fn draw_type(&self) -> GeometryType {
        self.draw_type
    }

    pub const fn interaction(&self) -> InteractionKind {
        self.interaction
    }

    pub fn active_kind(&self) -> Option<ActiveHandler> {
        match &self.mode {
            InteractionMode::Idle => None,
            InteractionMode::Draw(draw) => Some(ActiveHandler::Draw(draw.kind())),
            InteractionMode::Modify(_) => Some(ActiveHandler::Modify),
        }
    }

    pub fn handle_form(&mut self, event: FormEvent) {
        match event {
            FormEvent::DrawTypeChanged(kind) => {
                self.draw_type = kind;
                // Picking a geometry type always returns to drawing.
                self.interaction = InteractionKind::Draw;
            }
            FormEvent::InteractionChanged(kind) => self.interaction = kind,
        }
        self.activate();
    }

    /// Switch to the handler the selectors describe, dropping the previous
    /// handler (unfinished sketch or selection) entirely.
    pub fn activate(&mut self) {
        let next = match self.interaction {
            InteractionKind::Draw => InteractionMode::Draw(DrawGesture::new(self.draw_type)),
            InteractionKind::Modify => InteractionMode::Modify(ModifyGesture::default()),
        };
        self.mode = next;
        debug!(active = ?self.active_kind(), "interaction changed");
    }

    /// No handler active; pointer input is ignored until re-activated.
    pub fn deactivate(&mut self) {
        self.mode = InteractionMode::Idle;
    }

    pub fn selection(&self) -> &[FeatureKey] {
        match &self.mode {
            InteractionMode::Modify(modify) => modify.selection(),
            _ => &[],
        }
    }

    /// Empty the selection, returning what was selected.
    pub fn take_selection(&mut self) -> Vec<FeatureKey> {
        match &mut self.mode {
            InteractionMode::Modify(modify) => modify.take_selection(),
            _ => Vec::new(),
        }
    }

    pub const fn sketch(&self) -> Option<&DrawGesture> {
        match &self.mode {
            InteractionMode::Draw(draw) => Some(draw),
            _ => None,
        }
    }

    /// Feature whose vertex is being dragged, if any.
    pub fn dragging_feature(&self) -> Option<FeatureKey> {
        match &self.mode {
            InteractionMode::Modify(modify) => modify.dragging_feature(),
            _ => None,
        }
    }

    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        source: &mut FeatureSource,
        hit_tolerance: f64,
    ) -> PointerOutcome {
        match &mut self.mode {
            InteractionMode::Idle => PointerOutcome::ignored(),
            InteractionMode::Draw(draw) => draw.handle(event, hit_tolerance),
            InteractionMode::Modify(modify) => modify.handle(event, source, hit_tolerance),
        }
    }

    /// Escape: abandon an unfinished sketch.
    pub fn abort(&mut self) {
        if let InteractionMode::Draw(draw) = &mut self.mode {
            draw.abort();
        }
    }
}

#[cfg(test)]
mod tests;
