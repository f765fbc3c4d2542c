//! Session Management
//!
//! A `ChatSession` owns one conversation: reply history, suggestion state,
//! its random source and the turn generation counter. Turns within a
//! session run one at a time; a newer message cancels the pending delays of
//! an older one.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use wofa_config::SessionsConfig;

use crate::agent::{AgentReply, ChatEngine, TurnOutcome};
use crate::conversation::{ConversationState, SuggestionState};
use crate::metrics;
use crate::pacing::{SuggestionBasis, TurnTicket};
use crate::suggestions::{RandomSource, ThreadRandom};
use crate::AgentError;

pub struct ChatSession {
    pub id: String,
    engine: Arc<ChatEngine>,
    conversation: Mutex<ConversationState>,
    suggestions: Mutex<SuggestionState>,
    rng: Mutex<Box<dyn RandomSource>>,
    turn_lock: tokio::sync::Mutex<()>,
    generation: watch::Sender<u64>,
    pub created_at: Instant,
    last_activity: RwLock<Instant>,
    active: RwLock<bool>,
}

impl ChatSession {
    pub fn new(id: impl Into<String>, engine: Arc<ChatEngine>) -> Self {
        Self::with_random(id, engine, Box::new(ThreadRandom))
    }

    pub fn with_random(
        id: impl Into<String>,
        engine: Arc<ChatEngine>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            id: id.into(),
            conversation: Mutex::new(engine.new_conversation()),
            suggestions: Mutex::new(SuggestionState::default()),
            engine,
            rng: Mutex::new(rng),
            turn_lock: tokio::sync::Mutex::new(()),
            generation,
            created_at: Instant::now(),
            last_activity: RwLock::new(Instant::now()),
            active: RwLock::new(true),
        }
    }

    /// Process one user message
    ///
    /// Returns `TurnOutcome::Superseded` without touching session state when
    /// a newer message or a reset arrives before the reply is committed.
    pub async fn respond(&self, text: &str) -> Result<TurnOutcome, AgentError> {
        if !self.is_active() {
            return Err(AgentError::Session(format!("Session {} is closed", self.id)));
        }
        self.touch();

        let mut ticket = self.begin_turn();
        let _turn = self.turn_lock.lock().await;

        let thinking = {
            let mut rng = self.rng.lock();
            self.engine.pacer().thinking_delay(&mut **rng)
        };
        if !ticket.pause(thinking).await {
            return Ok(self.superseded(&ticket));
        }

        let draft = {
            let conversation = self.conversation.lock();
            self.engine.evaluate(&conversation, text)
        };

        let typing = self.engine.pacer().typing_delay(&draft.reply.text);
        if !ticket.pause(typing).await {
            return Ok(self.superseded(&ticket));
        }

        {
            let mut conversation = self.conversation.lock();
            if ticket.is_stale() {
                drop(conversation);
                return Ok(self.superseded(&ticket));
            }
            conversation.commit(draft.record, draft.matched_key.clone());
        }

        metrics::record_turn(&draft.reply.metadata);

        tracing::info!(
            session_id = %self.id,
            matched_key = ?draft.matched_key,
            fallback_tier = ?draft.fallback_tier.map(|t| t.as_str()),
            confidence = draft.reply.metadata.confidence,
            "Turn committed"
        );

        Ok(TurnOutcome::Replied(draft.reply))
    }

    /// Next suggestion list, after the reveal delay
    ///
    /// `None` when a newer turn or a reset started during the delay.
    pub async fn refresh_suggestions(&self, basis: SuggestionBasis) -> Option<Vec<String>> {
        let mut ticket = self.current_ticket();
        let delay = self.engine.pacer().reveal_delay(&basis);
        if !ticket.pause(delay).await {
            return None;
        }

        let topic = self.engine.classify(basis.text());
        let previous = self.suggestions.lock().last_suggestions.clone();
        let items = {
            let mut rng = self.rng.lock();
            self.engine.rotator().rotate(topic, &previous, &mut **rng)
        };

        let mut state = self.suggestions.lock();
        if ticket.is_stale() {
            return None;
        }
        state.update(topic, items.clone());
        tracing::debug!(session_id = %self.id, topic = %topic, "Suggestions refreshed");
        Some(items)
    }

    /// Suggestions for the default topic, shown when the session opens
    pub fn initial_suggestions(&self) -> Vec<String> {
        let items = {
            let mut rng = self.rng.lock();
            self.engine.rotator().initial(&mut **rng)
        };
        self.suggestions
            .lock()
            .update(wofa_core::Topic::Default, items.clone());
        items
    }

    /// Quick reply buttons for the latest reply
    pub fn quick_replies(&self) -> Vec<String> {
        let conversation = self.conversation.lock();
        self.engine.quick_replies(&conversation)
    }

    pub fn welcome(&self) -> AgentReply {
        self.engine.welcome_reply()
    }

    /// Clear conversation and suggestion state; cancels any in-flight turn
    pub fn reset(&self) {
        self.generation.send_modify(|g| *g += 1);
        self.conversation.lock().clear();
        self.suggestions.lock().clear();
        tracing::info!(session_id = %self.id, "Session reset");
    }

    pub fn conversation(&self) -> ConversationState {
        self.conversation.lock().clone()
    }

    pub fn suggestion_state(&self) -> SuggestionState {
        self.suggestions.lock().clone()
    }

    /// Keys related to the last accepted match
    pub fn related_to_last_match(&self) -> Vec<String> {
        let last = self.conversation.lock().last_matched_key().map(str::to_string);
        last.map(|key| self.engine.related_keys(&key))
            .unwrap_or_default()
    }

    pub fn engine(&self) -> &Arc<ChatEngine> {
        &self.engine
    }

    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.read().elapsed() > timeout
    }

    /// Close the session and cancel any in-flight turn
    pub fn close(&self) {
        *self.active.write() = false;
        self.generation.send_modify(|g| *g += 1);
    }

    pub fn is_active(&self) -> bool {
        *self.active.read()
    }

    fn begin_turn(&self) -> TurnTicket {
        let mut current = 0;
        self.generation.send_modify(|g| {
            *g += 1;
            current = *g;
        });
        TurnTicket::new(current, self.generation.subscribe())
    }

    fn current_ticket(&self) -> TurnTicket {
        let rx = self.generation.subscribe();
        let current = *rx.borrow();
        TurnTicket::new(current, rx)
    }

    fn superseded(&self, ticket: &TurnTicket) -> TurnOutcome {
        metrics::record_superseded();
        tracing::debug!(
            session_id = %self.id,
            generation = ticket.generation(),
            "Turn superseded"
        );
        TurnOutcome::Superseded
    }
}

/// Session manager
pub struct SessionManager {
    engine: Arc<ChatEngine>,
    sessions: RwLock<HashMap<String, Arc<ChatSession>>>,
    max_sessions: usize,
    session_timeout: Duration,
    cleanup_interval: Duration,
}

impl SessionManager {
    pub fn new(engine: Arc<ChatEngine>, config: &SessionsConfig) -> Self {
        Self {
            engine,
            sessions: RwLock::new(HashMap::new()),
            max_sessions: config.max_sessions,
            session_timeout: config.idle_timeout(),
            cleanup_interval: Duration::from_secs(300),
        }
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    /// Start a background task that periodically removes idle sessions
    ///
    /// Send `true` on the returned channel to stop it.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = manager.cleanup_interval;

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let before = manager.count();
                        manager.cleanup_expired();
                        let after = manager.count();
                        if before != after {
                            tracing::info!(
                                "Session cleanup: removed {} expired sessions ({} remaining)",
                                before - after,
                                after
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    /// Create a session with the thread-local random source
    pub fn create(&self) -> Result<Arc<ChatSession>, AgentError> {
        self.create_with_random(Box::new(ThreadRandom))
    }

    pub fn create_with_random(
        &self,
        rng: Box<dyn RandomSource>,
    ) -> Result<Arc<ChatSession>, AgentError> {
        let mut sessions = self.sessions.write();

        if sessions.len() >= self.max_sessions {
            self.cleanup_expired_internal(&mut sessions);

            if sessions.len() >= self.max_sessions {
                return Err(AgentError::SessionLimit(self.max_sessions));
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(ChatSession::with_random(&id, Arc::clone(&self.engine), rng));
        sessions.insert(id.clone(), Arc::clone(&session));
        metrics::record_active_sessions(sessions.len());

        tracing::info!(session_id = %id, "Created session");

        Ok(session)
    }

    pub fn get(&self, id: &str) -> Option<Arc<ChatSession>> {
        self.sessions.read().get(id).cloned()
    }

    pub fn remove(&self, id: &str) {
        let mut sessions = self.sessions.write();
        if let Some(session) = sessions.remove(id) {
            session.close();
            metrics::record_active_sessions(sessions.len());
            tracing::info!("Removed session: {}", id);
        }
    }

    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn list(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }

    pub fn cleanup_expired(&self) {
        let mut sessions = self.sessions.write();
        self.cleanup_expired_internal(&mut sessions);
    }

    fn cleanup_expired_internal(&self, sessions: &mut HashMap<String, Arc<ChatSession>>) {
        let timeout = self.session_timeout;
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| s.is_expired(timeout))
            .map(|(id, _)| id.clone())
            .collect();

        for id in expired {
            if let Some(session) = sessions.remove(&id) {
                session.close();
                tracing::info!("Expired session: {}", id);
            }
        }
        metrics::record_active_sessions(sessions.len());
    }
}
