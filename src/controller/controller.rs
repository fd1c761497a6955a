use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use futures::FutureExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::debounce::PendingCheck;
use super::snapshot::{ControllerState, InputSnapshot, PersistedState, TranslationResult};
use super::view::TranslationView;
use crate::error::TranslateError;
use crate::languages::AUTO;
use crate::translate::{Translation, Translator};

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    /// Idle time after the last keystroke before a request is considered
    pub debounce_delay: Duration,
    /// Delay used after the language pair changes
    pub language_change_delay: Duration,
    /// Shorter texts are never sent
    pub min_text_length: usize,
    /// A displayed result is cleared once the input length drifts further than this
    pub stale_output_threshold: usize,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            debounce_delay: Duration::from_millis(1500),
            language_change_delay: Duration::from_millis(500),
            min_text_length: 3,
            stale_output_threshold: 10,
        }
    }
}

/// Decides when a translation request is issued and whether its result is
/// still relevant once it arrives.
///
/// At most one check is pending and at most one request is in flight. A check
/// that fires while a request is outstanding does nothing; the next input
/// event schedules a fresh one.
///
/// Must be used from within a tokio runtime. Cloning yields another handle to
/// the same controller.
#[derive(Clone)]
pub struct TranslationRequestController {
    inner: Arc<Inner>,
}

struct Inner {
    translator: Arc<dyn Translator>,
    view: Arc<dyn TranslationView>,
    settings: ControllerSettings,
    session: Mutex<Session>,
}

struct Session {
    live: InputSnapshot,
    in_flight: bool,
    last_requested: Option<InputSnapshot>,
    last_completed_text: String,
    result: Option<TranslationResult>,
    pending: Option<PendingCheck>,
    next_check_id: u64,
    disposed: bool,
}

impl Session {
    fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(check) => {
                check.cancel();
                true
            }
            None => false,
        }
    }

    fn begin_request(&mut self, snapshot: &InputSnapshot) {
        self.in_flight = true;
        self.last_requested = Some(snapshot.clone());
    }
}

enum Completion {
    Applied(TranslationResult),
    Stale,
    Failed(TranslateError),
}

impl Inner {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn meets_min_length(&self, snapshot: &InputSnapshot) -> bool {
        snapshot.char_len() >= self.settings.min_text_length
    }

    /// Replace any pending check with one for the current live input
    fn schedule_check(self: &Arc<Self>, session: &mut Session, delay: Duration) {
        session.next_check_id += 1;
        let id = session.next_check_id;
        let snapshot = session.live.clone();
        let weak = Arc::downgrade(self);

        debug!("Scheduling check #{} in {:?}", id, delay);
        let check = PendingCheck::schedule(id, delay, async move {
            if let Some(inner) = weak.upgrade() {
                inner.fire_check(id, snapshot);
            }
        });

        if let Some(previous) = session.pending.replace(check) {
            previous.cancel();
        }
    }

    fn fire_check(self: &Arc<Self>, id: u64, snapshot: InputSnapshot) {
        {
            let mut session = self.session();
            // A superseded check may still run if it woke before being aborted
            if session.pending.as_ref().map(PendingCheck::id) != Some(id) {
                return;
            }
            session.pending = None;
            if session.disposed {
                return;
            }
            if session.live != snapshot {
                debug!("Check #{} skipped: input changed", id);
                return;
            }
            if session.in_flight {
                debug!("Check #{} suppressed: request already in flight", id);
                return;
            }
            session.begin_request(&snapshot);
        }
        self.dispatch(snapshot);
    }

    /// Caller must have marked the session in flight
    fn dispatch(self: &Arc<Self>, snapshot: InputSnapshot) {
        self.view.show_loading(true);
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            inner.run_request(snapshot).await;
        });
    }

    async fn run_request(self: Arc<Self>, snapshot: InputSnapshot) {
        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            source = %snapshot.source_lang,
            target = %snapshot.target_lang,
            chars = snapshot.char_len(),
            "Issuing translation request"
        );

        let call = self
            .translator
            .translate(&snapshot.text, &snapshot.source_lang, &snapshot.target_lang);
        let outcome = match AssertUnwindSafe(call).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(_) => Err(TranslateError::Unknown("translator panicked".to_string())),
        };

        self.complete(request_id, snapshot, outcome);
    }

    fn complete(
        &self,
        request_id: Uuid,
        snapshot: InputSnapshot,
        outcome: Result<Translation, TranslateError>,
    ) {
        let completion = {
            let mut session = self.session();
            session.in_flight = false;
            if session.disposed {
                debug!(%request_id, "Controller disposed, dropping response");
                return;
            }
            match outcome {
                Ok(translation) if session.live == snapshot => {
                    let result = TranslationResult {
                        source_text: snapshot.text.clone(),
                        translated_text: translation.translated_text,
                        detected_lang: translation.detected_lang,
                        completed_at: Utc::now(),
                    };
                    session.last_completed_text = snapshot.text.clone();
                    session.result = Some(result.clone());
                    Completion::Applied(result)
                }
                Ok(_) => Completion::Stale,
                Err(err) => Completion::Failed(err),
            }
        };

        self.view.show_loading(false);
        match completion {
            Completion::Applied(result) => {
                info!(%request_id, "Translation applied");
                self.view.show_result(&result);
                if snapshot.source_lang == AUTO {
                    if let Some(code) = &result.detected_lang {
                        self.view.show_detected_language(code);
                    }
                }
            }
            Completion::Stale => {
                debug!(%request_id, "Input changed while in flight, discarding result");
            }
            Completion::Failed(err) => {
                warn!(%request_id, "Translation failed: {}", err);
                self.view.show_error(err.category(), &err.user_message());
            }
        }
    }
}

impl TranslationRequestController {
    /// The live input starts empty with an `auto` → `en` pair
    pub fn new(
        translator: Arc<dyn Translator>,
        view: Arc<dyn TranslationView>,
        settings: ControllerSettings,
    ) -> Self {
        let session = Session {
            live: InputSnapshot::new("", AUTO, "en"),
            in_flight: false,
            last_requested: None,
            last_completed_text: String::new(),
            result: None,
            pending: None,
            next_check_id: 0,
            disposed: false,
        };

        Self {
            inner: Arc::new(Inner {
                translator,
                view,
                settings,
                session: Mutex::new(session),
            }),
        }
    }

    /// Set the starting language pair without notifying the view
    pub fn with_language_pair(
        self,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        {
            let mut session = self.inner.session();
            session.live.source_lang = source_lang.into();
            session.live.target_lang = target_lang.into();
        }
        self
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.inner.settings
    }

    /// Record new live input and restart the debounce
    pub fn on_input_changed(&self, snapshot: InputSnapshot) {
        let inner = &self.inner;
        let clear_output = {
            let mut session = inner.session();
            if session.disposed {
                return;
            }
            session.cancel_pending();
            session.live = snapshot.clone();

            if snapshot.is_empty() {
                session.result = None;
                session.last_completed_text.clear();
                true
            } else {
                let drifted = session.result.as_ref().is_some_and(|result| {
                    result.source_text.chars().count().abs_diff(snapshot.char_len())
                        > inner.settings.stale_output_threshold
                });
                if drifted {
                    session.result = None;
                    session.last_completed_text.clear();
                }
                if inner.meets_min_length(&snapshot) && snapshot.text != session.last_completed_text
                {
                    inner.schedule_check(&mut session, inner.settings.debounce_delay);
                }
                drifted
            }
        };

        if clear_output {
            inner.view.clear_output();
        }
    }

    /// Switch the language pair; retranslates the current text after a short delay
    pub fn on_language_pair_changed(
        &self,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) {
        let inner = &self.inner;
        {
            let mut session = inner.session();
            if session.disposed {
                return;
            }
            session.cancel_pending();
            session.live.source_lang = source_lang.into();
            session.live.target_lang = target_lang.into();
            session.result = None;

            if inner.meets_min_length(&session.live) {
                inner.schedule_check(&mut session, inner.settings.language_change_delay);
            }
        }
        inner.view.clear_output();
    }

    /// Issue a request for the live input right away. Returns false when the
    /// input is empty or a request is already in flight.
    pub fn translate_now(&self) -> bool {
        let snapshot = {
            let mut session = self.inner.session();
            if session.disposed {
                return false;
            }
            session.cancel_pending();
            if session.live.is_empty() || session.in_flight {
                return false;
            }
            let snapshot = session.live.clone();
            session.begin_request(&snapshot);
            snapshot
        };

        self.inner.dispatch(snapshot);
        true
    }

    /// Use the translation as new input and reverse the pair. Only possible
    /// with a displayed result and an explicit source language.
    pub fn swap_languages(&self) -> bool {
        let inner = &self.inner;
        let swapped = {
            let mut session = inner.session();
            if session.disposed || session.live.source_lang == AUTO {
                return false;
            }
            let Some(result) = session.result.take() else {
                return false;
            };
            session.cancel_pending();

            let swapped = InputSnapshot::new(
                &result.translated_text,
                session.live.target_lang.clone(),
                session.live.source_lang.clone(),
            );
            session.live = swapped.clone();
            session.last_completed_text.clear();

            if inner.meets_min_length(&swapped) {
                inner.schedule_check(&mut session, inner.settings.language_change_delay);
            }
            swapped
        };

        inner.view.update_input(&swapped);
        inner.view.clear_output();
        true
    }

    /// Empty the input and the output
    pub fn clear(&self) {
        let empty = self.live_input().with_text("");
        self.on_input_changed(empty.clone());
        self.inner.view.update_input(&empty);
    }

    /// Drop the scheduled check, if any. An in-flight request is left alone.
    pub fn cancel_pending(&self) -> bool {
        self.inner.session().cancel_pending()
    }

    /// Stop reacting to input; a response still in flight will be ignored
    pub fn dispose(&self) {
        let mut session = self.inner.session();
        session.disposed = true;
        session.cancel_pending();
        debug!("Translation controller disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.session().disposed
    }

    pub fn state(&self) -> ControllerState {
        let session = self.inner.session();
        ControllerState {
            is_in_flight: session.in_flight,
            last_requested_snapshot: session.last_requested.clone(),
            last_completed_text: session.last_completed_text.clone(),
        }
    }

    pub fn result(&self) -> Option<TranslationResult> {
        self.inner.session().result.clone()
    }

    pub fn live_input(&self) -> InputSnapshot {
        self.inner.session().live.clone()
    }

    pub fn has_pending_check(&self) -> bool {
        self.inner.session().pending.is_some()
    }

    pub fn persisted_state(&self) -> PersistedState {
        let session = self.inner.session();
        PersistedState {
            text: session.live.text.clone(),
            translation: session.result.clone(),
        }
    }

    /// Put saved input back. The saved translation is shown only if it was made
    /// for exactly that text; otherwise the text goes through the normal input path.
    pub fn restore(&self, state: PersistedState) {
        let inner = &self.inner;
        let (snapshot, shown) = {
            let mut session = inner.session();
            if session.disposed {
                return;
            }
            let snapshot = session.live.with_text(&state.text);
            let translation = state
                .translation
                .filter(|t| !snapshot.is_empty() && t.source_text == snapshot.text);

            match translation {
                Some(result) => {
                    session.cancel_pending();
                    session.live = snapshot.clone();
                    session.last_completed_text = snapshot.text.clone();
                    session.result = Some(result.clone());
                    (snapshot, Some(result))
                }
                None => (snapshot, None),
            }
        };

        inner.view.update_input(&snapshot);
        match shown {
            Some(result) => inner.view.show_result(&result),
            None => self.on_input_changed(snapshot),
        }
    }
}
