pub mod interface;
pub mod client;
pub mod google;
pub mod factory;

pub use interface::{TranslateRequest, TranslateResponse, Translation, Translator};
pub use client::HttpTranslator;
pub use google::GoogleTranslator;
pub use factory::TranslatorFactory;
