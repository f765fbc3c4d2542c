//! Wofa Ahoto console
//!
//! Line-oriented chat in the terminal. Type a question, pick a suggestion by
//! its number, `/quick` to list quick replies for the last answer, `/reset`
//! to start over or `/quit` to leave.

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use wofa_agent::{AgentReply, ChatAgent, ChatEngine, SessionManager, SuggestionBasis, TurnOutcome};
use wofa_config::{load_settings, DomainConfig, ObservabilityConfig, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("WOFA_ENV").ok();
    let (settings, load_error) = match load_settings(env.as_deref()) {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };

    init_tracing(&settings.observability);

    if let Some(e) = load_error {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
    }
    tracing::info!(
        environment = ?settings.environment,
        config_path = env.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    let domain = DomainConfig::load_or_builtin(&settings.domain_config_path)?;
    let engine = Arc::new(ChatEngine::new(&settings, &domain)?);

    let manager = Arc::new(SessionManager::new(engine, &settings.sessions));
    let cleanup = manager.start_cleanup_task();
    let session = manager.create()?;

    let (welcome, mut suggestions) = session.greet();
    print_reply(session.name(), &welcome);
    print_suggestions(&suggestions);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/quick" => {
                // quick replies are numbered after the suggestion chips
                let quick = session.quick_replies();
                suggestions.retain(|s| !quick.contains(s));
                suggestions.extend(quick);
                print_suggestions(&suggestions);
                continue;
            }
            "/reset" => {
                session.reset();
                let (welcome, fresh) = session.greet();
                suggestions = fresh;
                print_reply(session.name(), &welcome);
                print_suggestions(&suggestions);
                continue;
            }
            _ => {}
        }

        // a number picks a suggestion chip
        let chip = input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| suggestions.get(i).cloned());
        let message = chip.clone().unwrap_or_else(|| input.to_string());
        if chip.is_some() {
            println!("> {}", message);
        }

        let reply = match session.process(&message).await? {
            TurnOutcome::Replied(reply) => reply,
            TurnOutcome::Superseded => continue,
        };
        print_reply(session.name(), &reply);

        let basis = match chip {
            Some(text) => SuggestionBasis::Chip(text),
            None => SuggestionBasis::Reply(reply.text.clone()),
        };
        if let Some(next) = session.suggestions_after(basis).await {
            suggestions = next;
            print_suggestions(&suggestions);
        }
    }

    manager.remove(&session.id);
    let _ = cleanup.send(true);
    tracing::info!("Console session ended");
    Ok(())
}

fn init_tracing(config: &ObservabilityConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_level.clone().into());

    let fmt_layer = if config.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn print_reply(name: &str, reply: &AgentReply) {
    println!("\n{}: {}\n", name, reply.text);
}

fn print_suggestions(suggestions: &[String]) {
    for (i, suggestion) in suggestions.iter().enumerate() {
        println!("  [{}] {}", i + 1, suggestion);
    }
    println!();
}
