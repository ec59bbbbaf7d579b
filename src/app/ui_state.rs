use crate::model::Coord;

pub struct UiState {
    pub(super) side_open: bool,
    /// Service URL field; applied when editing ends.
    pub(super) url_text: String,
    pub(super) last_status: Option<String>,
    pub(super) pointer_map: Option<Coord>,
}

impl UiState {
    pub(super) fn new(base_url: &str) -> Self {
        Self {
            side_open: true,
            url_text: base_url.to_string(),
            last_status: None,
            pointer_map: None,
        }
    }

    pub(super) fn set_status(&mut self, status: impl Into<String>) {
        self.last_status = Some(status.into());
    }
}
