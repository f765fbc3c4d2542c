//! Integration tests for whole conversations (message -> reply -> suggestions)
//!
//! These drive `ChatSession` the way a front end does, against the bundled
//! SIC Life knowledge base.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use wofa_agent::{ChatAgent, ChatEngine, ChatSession, SeededRandom, SuggestionBasis, TurnOutcome};
use wofa_config::constants::confidence::HEDGE_PREFIX;
use wofa_config::{DomainConfig, PacingConfig, Settings};
use wofa_core::{FallbackTier, Topic};

fn settings(pacing: PacingConfig) -> Settings {
    Settings {
        pacing,
        ..Settings::default()
    }
}

fn engine_with(pacing: PacingConfig) -> Arc<ChatEngine> {
    let domain = DomainConfig::builtin().unwrap();
    Arc::new(ChatEngine::new(&settings(pacing), &domain).unwrap())
}

fn session(id: &str) -> ChatSession {
    ChatSession::with_random(
        id,
        engine_with(PacingConfig::disabled()),
        Box::new(SeededRandom::new(7)),
    )
}

async fn reply(session: &ChatSession, text: &str) -> wofa_agent::AgentReply {
    session
        .respond(text)
        .await
        .unwrap()
        .into_reply()
        .expect("turn should not be superseded")
}

/// Three unmatched messages in a row escalate through every fallback tier
#[tokio::test]
async fn test_fallback_escalation() {
    let session = session("test-escalation");

    let first = reply(&session, "xyzzy plugh").await;
    assert_eq!(first.metadata.fallback_tier, Some(FallbackTier::FirstMiss));
    assert!(first.text.starts_with("I apologize"));

    let second = reply(&session, "qwrtp zzkv").await;
    assert_eq!(second.metadata.fallback_tier, Some(FallbackTier::RepeatedMiss));
    assert!(second.text.starts_with("I'm here to help"));

    let third = reply(&session, "blorf wibble").await;
    assert_eq!(third.metadata.fallback_tier, Some(FallbackTier::PersistentMiss));
    assert!(third.text.starts_with("I want to make sure"));

    // stays at the last tier
    let fourth = reply(&session, "grmbl").await;
    assert_eq!(fourth.metadata.fallback_tier, Some(FallbackTier::PersistentMiss));

    let accept = session.engine().thresholds().accept;
    for r in [&first, &second, &third, &fourth] {
        assert!(r.metadata.confidence <= accept);
        assert!(r.metadata.matched_key.is_none());
    }
}

/// Reset forgets the history, so escalation starts over
#[tokio::test]
async fn test_reset_restarts_escalation() {
    let session = session("test-reset");

    reply(&session, "xyzzy plugh").await;
    reply(&session, "qwrtp zzkv").await;
    session.reset();

    assert!(session.conversation().is_empty());
    let after = reply(&session, "blorf wibble").await;
    assert_eq!(after.metadata.fallback_tier, Some(FallbackTier::FirstMiss));
}

/// A claim question is answered from the claims entry
#[tokio::test]
async fn test_claim_question_answered() {
    let session = session("test-claim");
    let answer = reply(&session, "How do I make a claim?").await;

    assert_eq!(answer.metadata.matched_key.as_deref(), Some("claims_process"));
    assert_eq!(answer.metadata.category, "claims");
    assert!(answer.metadata.confidence > 0.4);
    assert!(answer.metadata.fallback_tier.is_none());

    let hedged = answer.metadata.confidence < session.engine().thresholds().hedge;
    assert_eq!(answer.text.starts_with(HEDGE_PREFIX), hedged);
    assert!(answer.text.contains("To file a claim with SIC Life"));

    assert_eq!(
        session.conversation().last_matched_key(),
        Some("claims_process")
    );
}

/// A match between two misses breaks the escalation chain only once it ages out
#[tokio::test]
async fn test_match_between_misses_keeps_escalating() {
    let session = session("test-interleaved");

    reply(&session, "xyzzy plugh").await;
    let answer = reply(&session, "mobile money payment").await;
    assert_eq!(answer.metadata.matched_key.as_deref(), Some("payment_methods"));

    let miss = reply(&session, "qwrtp zzkv").await;
    assert_eq!(miss.metadata.fallback_tier, Some(FallbackTier::RepeatedMiss));
}

/// Chip suggestions stay within the chip's topic and its related topics
#[tokio::test]
async fn test_payment_chip_suggestions() {
    let session = session("test-suggestions");
    let domain = DomainConfig::builtin().unwrap();

    let allowed: HashSet<&str> = [Topic::Payment, Topic::Policy, Topic::Agent, Topic::Claims]
        .into_iter()
        .flat_map(|topic| domain.topics.suggestions(topic).iter().map(String::as_str))
        .collect();

    for _ in 0..20 {
        let items = session
            .refresh_suggestions(SuggestionBasis::Chip("pay premium".to_string()))
            .await
            .unwrap();

        assert_eq!(items.len(), 5);
        let unique: HashSet<&String> = items.iter().collect();
        assert_eq!(unique.len(), 5, "duplicate suggestion in {:?}", items);
        for item in &items {
            assert!(allowed.contains(item.as_str()), "unexpected suggestion {}", item);
        }
    }

    let state = session.suggestion_state();
    assert_eq!(state.active_topic, Topic::Payment);
    assert_eq!(state.last_suggestions.len(), 5);
}

/// Greeting comes with five default-topic suggestions
#[tokio::test]
async fn test_greeting() {
    let session = session("test-greeting");
    let (welcome, suggestions) = session.greet();

    assert!(welcome.text.contains("Wofa Ahoto"));
    assert!(welcome.metadata.matched_key.is_none());
    assert_eq!(suggestions.len(), 5);
    assert_eq!(session.name(), "Wofa Ahoto");
}

/// Related entries follow the last accepted match
#[tokio::test]
async fn test_related_to_last_match() {
    let session = session("test-related");
    assert!(session.related_to_last_match().is_empty());

    reply(&session, "How do I make a claim?").await;
    let related = session.related_to_last_match();
    assert!(related.len() <= 2);
    assert!(!related.iter().any(|k| k == "claims_process"));

    // a miss leaves the last match in place
    reply(&session, "xyzzy plugh").await;
    assert_eq!(session.related_to_last_match(), related);
}

/// A newer message cancels the pending reply of an older one
#[tokio::test]
async fn test_newer_message_supersedes_pending_turn() {
    let pacing = PacingConfig {
        enabled: true,
        thinking_min_ms: 200,
        thinking_max_ms: 200,
        typing_min_ms: 0,
        typing_max_ms: 0,
        ..PacingConfig::default()
    };
    let session = Arc::new(ChatSession::with_random(
        "test-supersede",
        engine_with(pacing),
        Box::new(SeededRandom::new(1)),
    ));

    let pending = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.respond("xyzzy plugh").await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    let second = session.respond("How do I make a claim?").await.unwrap();
    let first = pending.await.unwrap().unwrap();

    assert_eq!(first, TurnOutcome::Superseded);
    let second = second.into_reply().unwrap();
    assert_eq!(second.metadata.matched_key.as_deref(), Some("claims_process"));

    // only the surviving turn was committed
    let history = session.conversation();
    assert_eq!(history.len(), 1);
    assert_eq!(history.recent_replies().next().unwrap().key, "claims_process");
}

/// Reset during the thinking pause drops the pending reply
#[tokio::test]
async fn test_reset_cancels_pending_turn() {
    let pacing = PacingConfig {
        enabled: true,
        thinking_min_ms: 200,
        thinking_max_ms: 200,
        typing_min_ms: 0,
        typing_max_ms: 0,
        ..PacingConfig::default()
    };
    let session = Arc::new(ChatSession::with_random(
        "test-reset-pending",
        engine_with(pacing),
        Box::new(SeededRandom::new(1)),
    ));

    let pending = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.respond("How do I make a claim?").await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    session.reset();

    assert_eq!(pending.await.unwrap().unwrap(), TurnOutcome::Superseded);
    assert!(session.conversation().is_empty());
}

/// Quick replies track the latest reply and return to the greeting's set on reset
#[tokio::test]
async fn test_quick_replies_follow_conversation() {
    let session = session("test-quick-replies");
    let agent: &dyn ChatAgent = &session;

    assert_eq!(agent.quick_replies()[0], "I need an insurance quote");

    reply(&session, "How do I make a claim?").await;
    assert_eq!(
        agent.quick_replies(),
        ["Start a new claim", "Track my claim status", "Required documents", "Speak to an agent"]
    );

    reply(&session, "mobile money payment").await;
    assert_eq!(agent.quick_replies()[0], "Pay with Mobile Money");

    agent.reset();
    assert_eq!(agent.quick_replies()[0], "I need an insurance quote");
}
