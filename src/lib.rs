pub mod config;
pub mod controller;
pub mod error;
pub mod languages;
pub mod logging;
pub mod persistence;
pub mod routes;
pub mod state;
pub mod translate;

pub use config::Config;
pub use controller::{
    ControllerSettings, ControllerState, InputSnapshot, PersistedState,
    TranslationRequestController, TranslationResult, TranslationView,
};
pub use error::{FailureCategory, TranslateError};
pub use translate::{HttpTranslator, Translation, Translator};
