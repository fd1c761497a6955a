use super::snapshot::{InputSnapshot, TranslationResult};
use crate::error::FailureCategory;

/// Presentation side of the widget. Called from controller tasks, never
/// while the controller holds its own lock, so implementations may call back
/// into the controller.
pub trait TranslationView: Send + Sync {
    fn show_result(&self, result: &TranslationResult);

    fn show_error(&self, category: FailureCategory, message: &str);

    fn show_loading(&self, loading: bool);

    fn show_detected_language(&self, code: &str);

    /// Remove the displayed translation and detected-language badge
    fn clear_output(&self);

    /// The controller replaced the input itself (swap, clear, restore)
    fn update_input(&self, _snapshot: &InputSnapshot) {}
}
