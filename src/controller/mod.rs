pub mod controller;
pub mod debounce;
pub mod snapshot;
pub mod view;

pub use controller::{ControllerSettings, TranslationRequestController};
pub use debounce::PendingCheck;
pub use snapshot::{ControllerState, InputSnapshot, PersistedState, TranslationResult};
pub use view::TranslationView;
