#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quick_translate::{
    FailureCategory, InputSnapshot, TranslateError, Translation, TranslationResult,
    TranslationView, Translator,
};
use tokio::sync::mpsc;

/// Upstream engine answering from a closure and recording every call
pub struct ScriptedEngine {
    pub calls: Mutex<Vec<(String, String, String)>>,
    respond: Box<dyn Fn(&str, &str, &str) -> Result<Translation, TranslateError> + Send + Sync>,
}

impl ScriptedEngine {
    pub fn new(
        respond: impl Fn(&str, &str, &str) -> Result<Translation, TranslateError>
            + Send
            + Sync
            + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Translator for ScriptedEngine {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Translation, TranslateError> {
        self.calls.lock().unwrap().push((
            text.to_string(),
            source_lang.to_string(),
            target_lang.to_string(),
        ));
        (self.respond)(text, source_lang, target_lang)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Result(String),
    Error(FailureCategory, String),
    Loading(bool),
    Detected(String),
    Cleared,
    Input(String),
}

/// View that forwards every call into a channel
pub struct ChannelView {
    tx: mpsc::UnboundedSender<ViewEvent>,
}

impl ChannelView {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<ViewEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }

    fn send(&self, event: ViewEvent) {
        let _ = self.tx.send(event);
    }
}

impl TranslationView for ChannelView {
    fn show_result(&self, result: &TranslationResult) {
        self.send(ViewEvent::Result(result.translated_text.clone()));
    }

    fn show_error(&self, category: FailureCategory, message: &str) {
        self.send(ViewEvent::Error(category, message.to_string()));
    }

    fn show_loading(&self, loading: bool) {
        self.send(ViewEvent::Loading(loading));
    }

    fn show_detected_language(&self, code: &str) {
        self.send(ViewEvent::Detected(code.to_string()));
    }

    fn clear_output(&self) {
        self.send(ViewEvent::Cleared);
    }

    fn update_input(&self, snapshot: &InputSnapshot) {
        self.send(ViewEvent::Input(snapshot.text.clone()));
    }
}
