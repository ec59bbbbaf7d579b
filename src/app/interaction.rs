use egui::Pos2;

/// What the primary drag on the canvas is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasDrag {
    /// Not claimed by the active handler: moves the view.
    Pan,
    /// Claimed by the active handler.
    Edit,
}

#[derive(Debug, Default)]
pub struct CanvasState {
    pub(super) drag: Option<CanvasDrag>,
    pub(super) last_hover: Option<Pos2>,
}

impl CanvasState {
    pub(super) fn panning(&self) -> bool {
        self.drag == Some(CanvasDrag::Pan)
    }
}
