//! Terminal front-end for the translation widget.
//!
//! Every plain line replaces the current input. Commands:
//! `:lang SRC TGT`, `:swap`, `:go`, `:clear`, `:quit`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use quick_translate::{
    config::Config,
    languages,
    logging,
    persistence::{self, JsonFileStore, SnapshotStore},
    FailureCategory, HttpTranslator, InputSnapshot, TranslationRequestController,
    TranslationResult, TranslationView,
};

struct TerminalView;

impl TranslationView for TerminalView {
    fn show_result(&self, result: &TranslationResult) {
        println!("=> {}", result.translated_text);
    }

    fn show_error(&self, category: FailureCategory, message: &str) {
        println!("!! [{:?}] {}", category, message);
    }

    fn show_loading(&self, loading: bool) {
        if loading {
            println!("   translating...");
        }
    }

    fn show_detected_language(&self, code: &str) {
        println!("   detected: {}", languages::display_name(code));
    }

    fn clear_output(&self) {
        println!("   (output cleared)");
    }

    fn update_input(&self, snapshot: &InputSnapshot) {
        println!(
            "   input: {:?} [{}]",
            snapshot.text,
            languages::translation_path(&snapshot.source_lang, &snapshot.target_lang)
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::discover()?;
    logging::init_tracing("quick_translate=warn");

    let widget = &config.widget;
    let translator = HttpTranslator::new(
        &widget.endpoint,
        Duration::from_secs(widget.request_timeout_secs),
    )?;
    let controller = TranslationRequestController::new(
        Arc::new(translator),
        Arc::new(TerminalView),
        widget.controller_settings(),
    )
    .with_language_pair(&widget.default_source_lang, &widget.default_target_lang);

    let store: Arc<dyn SnapshotStore> = Arc::new(JsonFileStore::new(&widget.state_file));
    match store.load() {
        Ok(Some(saved)) => controller.restore(saved),
        Ok(None) => {}
        Err(e) => warn!("Could not load saved state: {:#}", e),
    }
    let autosave = persistence::spawn_autosave(
        controller.clone(),
        store.clone(),
        Duration::from_millis(widget.autosave_interval_ms),
    );

    println!(
        "Translating {} via {}",
        languages::translation_path(&widget.default_source_lang, &widget.default_target_lang),
        widget.endpoint
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        match words.next() {
            Some(":quit") => break,
            Some(":go") => {
                if !controller.translate_now() {
                    println!("   nothing to translate or a request is already running");
                }
            }
            Some(":swap") => {
                if !controller.swap_languages() {
                    println!("   swap needs a translation and an explicit source language");
                }
            }
            Some(":clear") => controller.clear(),
            Some(":lang") => match (words.next(), words.next()) {
                (Some(source), Some(target))
                    if languages::is_supported_source(source)
                        && languages::is_supported_target(target) =>
                {
                    controller.on_language_pair_changed(source, target);
                }
                _ => println!("   usage: :lang SRC TGT (codes: {})", languages::codes().join(", ")),
            },
            _ => {
                let live = controller.live_input();
                controller.on_input_changed(live.with_text(&line));
            }
        }
    }

    autosave.abort();
    if let Err(e) = store.save(&controller.persisted_state()) {
        warn!("Could not save state: {:#}", e);
    }
    controller.dispose();
    Ok(())
}
