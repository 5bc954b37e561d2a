//! Pulse chat client entry point
//!
//! Run with:
//! ```bash
//! cargo run -p pulse-client -- <name>
//! ```
//!
//! Lines ending with a backslash stay in the compose buffer and signal
//! typing; a plain line sends the buffered text as one message.

use pulse_client::{ChatSession, HttpTypingSink, Notice, TypingPublisher};
use pulse_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use pulse_core::{generate_client_id, ParticipantId};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, Level};

#[tokio::main]
async fn main() {
    // Keep the terminal quiet unless RUST_LOG says otherwise
    let tracing_config = TracingConfig {
        level: Level::WARN,
        ..TracingConfig::default()
    };
    if let Err(e) = try_init_tracing_with_config(&tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Client failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    let participant_id = match std::env::args().nth(1) {
        Some(name) => ParticipantId::new(name)?,
        None => ParticipantId::new(generate_client_id())?,
    };
    let client_id = generate_client_id();

    let realtime = pulse_realtime::connect(&config.realtime)?;
    let publisher = TypingPublisher::new(Arc::new(HttpTypingSink::new(
        &config.client.backend_url,
        participant_id.clone(),
    )));

    let (session, mut notices) = ChatSession::start(
        Arc::clone(&realtime),
        participant_id.clone(),
        client_id,
        config.typing.ttl(),
    )
    .await?;

    println!(
        "Joined as {} ({})",
        participant_id,
        realtime.connection_state()
    );
    println!("End a line with \\ to keep composing. /who lists members, /quit exits.");

    tokio::spawn(async move {
        while let Some(notice) = notices.recv().await {
            print_notice(&notice);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut draft = String::new();
    while let Some(line) = lines.next_line().await? {
        match line.trim_end() {
            "/quit" => break,
            "/who" => println!("members: {}", session.roster().join(", ")),
            text => {
                if let Some(partial) = text.strip_suffix('\\') {
                    draft.push_str(partial);
                    publisher.keystroke().await;
                } else {
                    draft.push_str(text);
                    let message = std::mem::take(&mut draft);
                    if !message.trim().is_empty() {
                        session.send_message(&message).await;
                    }
                    publisher.stop().await;
                }
            }
        }
    }

    publisher.stop().await;
    session.leave().await;
    realtime.close().await;
    println!("bye");
    Ok(())
}

fn print_notice(notice: &Notice) {
    match notice {
        Notice::Chat {
            participant_id,
            text,
            own,
        } => {
            if *own {
                println!("you: {text}");
            } else {
                println!("{participant_id}: {text}");
            }
        }
        Notice::Joined(id) => println!("* {id} joined"),
        Notice::Left(id) => println!("* {id} left"),
        Notice::TypingChanged(ids) => {
            if !ids.is_empty() {
                let verb = if ids.len() == 1 { "is" } else { "are" };
                println!("[{} {} typing...]", ids.join(", "), verb);
            }
        }
    }
}
