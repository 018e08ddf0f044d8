//! Hive CLI
//!
//! Headless line-oriented frontend for the Hive collective. Connects to
//! the conversation stream, prints every applied event as a plain line,
//! and forwards stdin lines as submissions. No layout, no styling, no
//! scroll handling; richer frontends belong in their own crates on top
//! of `hive-core`.
//!
//! # Usage
//!
//! ```bash
//! # Connect to the default endpoint (ws://127.0.0.1:8000/ws-chat)
//! hive
//!
//! # Point at another backend
//! hive --endpoint ws://example.test:8000/ws-chat
//!
//! # Cap the discussion at two rounds and replay server history first
//! hive --rounds 2 --rehydrate
//!
//! # With verbose logging
//! RUST_LOG=debug hive
//! ```
//!
//! # Commands
//!
//! - `/reset`: clear the local transcript (the connection stays up)
//! - `/quit`: disconnect and exit
//!
//! # Environment Variables
//!
//! - `HIVE_ENDPOINT`: Websocket endpoint of the conversation stream
//! - `HIVE_REST_BASE`: Base URL of the REST companion API
//! - `HIVE_AUTONOMOUS_ROUNDS`: Agent rounds between user turns (2-8)
//! - `HIVE_TEMPERATURE`: Sampling temperature forwarded to the agents
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)
//!
//! # Signals
//!
//! - Ctrl+C: graceful disconnect and exit

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{info, warn};

use hive_core::{
    ClientConfig, ConversationEvent, HiveClient, RestClient, ServerTransport, Speaker,
    WebSocketTransport, DEFAULT_WAITING_PROMPT,
};

/// Talk to the Hive agent collective from a terminal
#[derive(Debug, Parser)]
#[command(name = "hive", version, about)]
struct Args {
    /// Websocket endpoint of the conversation stream
    #[arg(long, env = "HIVE_ENDPOINT")]
    endpoint: Option<String>,

    /// Agent rounds allowed between user turns (clamped to 2-8)
    #[arg(long, env = "HIVE_AUTONOMOUS_ROUNDS")]
    rounds: Option<u8>,

    /// Sampling temperature forwarded to the agents
    #[arg(long, env = "HIVE_TEMPERATURE")]
    temperature: Option<f32>,

    /// Print the server-side transcript before attaching to the stream
    #[arg(long)]
    rehydrate: bool,

    /// Config file path (default: ~/.config/hive/client.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    /// Resolve the effective configuration: file, then environment, then
    /// explicit flags
    fn resolve_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load_from_path(Some(path.clone()))?,
            None => ClientConfig::load()?,
        };

        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(rounds) = self.rounds {
            config.session = config.session.with_max_autonomous_rounds(rounds);
        }
        if let Some(temperature) = self.temperature {
            config.session = config.session.with_temperature(temperature);
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hive=info".parse()?)
                .add_directive("hive_core=info".parse()?),
        )
        .with_target(true)
        .init();

    let config = args.resolve_config()?;

    info!(endpoint = %config.endpoint, "Starting Hive CLI");

    let transport = WebSocketTransport::new(config.endpoint.clone());
    let mut client = HiveClient::new(transport, config);

    if args.rehydrate {
        replay_history(&client).await;
    }

    client.connect().await?;
    println!("[hive] connected to {}", client.config().endpoint);
    println!("[hive] type a message and press Enter; /reset clears, /quit exits");

    run_session(&mut client).await?;

    client.disconnect().await?;
    info!("Session ended");
    println!("[hive] goodbye");
    Ok(())
}

/// Pump the stream and stdin until the user quits or the server goes away
async fn run_session<T: ServerTransport>(client: &mut HiveClient<T>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut poll = tokio::time::interval(Duration::from_millis(50));

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down");
                break;
            }

            line = lines.next_line() => {
                let Some(line) = line? else {
                    // stdin closed
                    break;
                };
                if !handle_line(client, line.trim()).await {
                    break;
                }
            }

            _ = poll.tick() => {
                for event in client.poll_events() {
                    print_event(client, &event);
                }
                if !client.is_connected() {
                    println!("[hive] connection closed");
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply one stdin line; returns false when the session should end
async fn handle_line<T: ServerTransport>(client: &mut HiveClient<T>, line: &str) -> bool {
    match line {
        "/quit" => return false,
        "/reset" => {
            client.reset();
            println!("[hive] conversation cleared");
        }
        "" => {}
        text => match client.submit(text).await {
            Ok(true) => {}
            Ok(false) => {
                if client.is_connected() {
                    println!("[hive] {}", client.phase().description());
                } else {
                    println!("[hive] not connected");
                }
            }
            Err(e) => {
                // The poll branch will observe the close and end the session
                warn!(error = %e, "Submission failed to send");
            }
        },
    }
    true
}

/// One plain output line per applied event
fn print_event<T: ServerTransport>(client: &HiveClient<T>, event: &ConversationEvent) {
    let roster = client.roster();
    match event {
        ConversationEvent::Typing { agent } => {
            println!(
                "* {} is typing... (round {})",
                roster.display_name(agent),
                client.round()
            );
        }
        ConversationEvent::Final { agent, content } => {
            println!("{}: {content}", roster.display_name(agent));
        }
        ConversationEvent::AwaitingUser { message } => {
            println!(
                "-- {} --",
                message.as_deref().unwrap_or(DEFAULT_WAITING_PROMPT)
            );
        }
        ConversationEvent::PeerEcho { speaker, content } => match speaker {
            Speaker::User => println!("you: {content}"),
            Speaker::System => println!("[hive] {content}"),
            Speaker::Agent(id) => println!("{}: {content}", roster.display_name(id)),
        },
    }
}

/// Print the server-side transcript via the REST companion API
///
/// Best effort: a failure is logged and the stream session proceeds.
async fn replay_history<T: ServerTransport>(client: &HiveClient<T>) {
    let rest = RestClient::from_config(client.config());
    match rest.history().await {
        Ok(entries) if entries.is_empty() => {
            println!("[hive] no server-side history");
        }
        Ok(entries) => {
            for entry in &entries {
                match entry.speaker() {
                    Speaker::User => println!("you: {}", entry.content),
                    Speaker::System => println!("[hive] {}", entry.content),
                    Speaker::Agent(id) => {
                        println!("{}: {}", client.roster().display_name(&id), entry.content);
                    }
                }
            }
        }
        Err(e) => warn!(error = %e, "Could not fetch server history"),
    }
}
