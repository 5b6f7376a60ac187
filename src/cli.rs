//! CLI surface: argument parsing, interactive session, terminal rendering.

use std::io::Write;

use clap::Parser;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use futures::StreamExt;
use rustyline::error::ReadlineError;
use termimad::MadSkin;

use crate::agent::Agent;
use crate::chat::{Reply, TokenStream};
use crate::config::AgentConfig;
use crate::error::{JoaoError, Result};

/// Simple OpenAI-compatible chat client.
#[derive(Parser, Debug)]
#[command(name = "joao", version, about = "Minimal OpenAI-style chat client")]
pub struct Cli {
    /// Prompt to send to the model. If not provided, enters chat mode.
    pub prompt: Option<String>,

    /// System prompt to use
    #[arg(short, long, default_value = "You are a helpful assistant.")]
    pub system: String,

    /// Sampling temperature (0.0-2.0), higher is more random
    #[arg(short, long, default_value_t = 0.0)]
    pub temperature: f64,

    /// Environment prefix for variables (e.g. 'ALIBABA' for ALIBABA_OPENAI_API_KEY)
    #[arg(short = 'e', long = "env")]
    pub env_prefix: Option<String>,

    /// Stream the response token by token
    #[arg(long)]
    pub stream: bool,

    /// Show raw output without markdown formatting
    #[arg(long)]
    pub raw: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Run the CLI to completion. Errors returned here become a terminal
/// message and a non-zero exit in `main`.
pub async fn run(cli: Cli) -> Result<()> {
    if cli.debug {
        init_tracing();
    }

    if !(0.0..=2.0).contains(&cli.temperature) {
        return Err(JoaoError::Configuration(
            "temperature must be between 0 and 2".into(),
        ));
    }

    let mut agent = Agent::new(build_config(&cli)?);
    let skin = MadSkin::default();

    match &cli.prompt {
        Some(prompt) => one_shot(&mut agent, prompt, &cli, &skin).await,
        None => chat_session(agent, &cli, &skin).await,
    }
}

fn build_config(cli: &Cli) -> Result<AgentConfig> {
    let mut builder = AgentConfig::builder()
        .system_prompt(cli.system.clone())
        .temperature(cli.temperature)
        .debug(cli.debug);
    if let Some(prefix) = &cli.env_prefix {
        builder = builder.tenant_prefix(prefix.to_uppercase());
    }
    builder.build()
}

async fn one_shot(agent: &mut Agent, prompt: &str, cli: &Cli, skin: &MadSkin) -> Result<()> {
    if cli.stream {
        let stream = agent.stream(prompt).await?;
        render_stream(stream, cli.raw, skin).await
    } else {
        let reply = agent.request(prompt).await?;
        render_reply(&reply, cli.raw, skin);
        Ok(())
    }
}

async fn chat_session(mut agent: Agent, cli: &Cli, skin: &MadSkin) -> Result<()> {
    print_banner(&agent);
    println!("\nStarting chat session. Commands:");
    println!("  /reset             - Clear conversation");
    println!("  /reset <prompt>    - Clear conversation and set new system prompt");
    println!("  Ctrl+C             - Exit session");

    let mut editor = rustyline::DefaultEditor::new()
        .map_err(|e| JoaoError::Configuration(format!("failed to start line editor: {e}")))?;

    loop {
        match editor.readline("\nYou: ") {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(&line);

                if line == "/reset" || line.starts_with("/reset ") {
                    let new_system = line["/reset".len()..].trim();
                    clear_screen();
                    agent.reset((!new_system.is_empty()).then_some(new_system));
                    print_banner(&agent);
                    if new_system.is_empty() {
                        println!("\nConversation reset.");
                    } else {
                        println!("\nConversation reset with new system prompt.");
                    }
                    continue;
                }

                println!("\nAssistant:");
                let outcome = if cli.stream {
                    match agent.stream(&line).await {
                        Ok(stream) => render_stream(stream, cli.raw, skin).await,
                        Err(e) => Err(e),
                    }
                } else {
                    agent
                        .request(&line)
                        .await
                        .map(|reply| render_reply(&reply, cli.raw, skin))
                };
                // Per-request failures keep the session alive.
                if let Err(e) = outcome {
                    eprintln!("Error: {e}");
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("\nExiting chat session...");
                break;
            }
            Err(e) => {
                return Err(JoaoError::Configuration(format!("input error: {e}")));
            }
        }
    }
    Ok(())
}

fn print_banner(agent: &Agent) {
    let config = agent.config();
    println!("\nModel: {}", config.model);
    println!("Temperature: {} (0.0-2.0)", config.temperature);
    println!(
        "System: {}",
        config.system_prompt.as_deref().unwrap_or("No system prompt set")
    );
}

fn render_reply(reply: &Reply, raw: bool, skin: &MadSkin) {
    match reply {
        Reply::Text(text) => {
            if raw {
                println!("{text}");
            } else {
                skin.print_text(text);
            }
        }
        Reply::ToolCalls(calls) => {
            for call in calls {
                println!("Tool call requested: {} {}", call.name, call.arguments);
            }
        }
    }
}

/// Print fragments as they arrive. Without `--raw`, buffer to whole lines
/// so markdown constructs render intact; Ctrl+C abandons the stream, which
/// commits nothing to history.
async fn render_stream(mut stream: TokenStream, raw: bool, skin: &MadSkin) -> Result<()> {
    let mut buffer = String::new();
    loop {
        tokio::select! {
            fragment = stream.next() => {
                match fragment {
                    Some(Ok(fragment)) => {
                        if raw {
                            print!("{fragment}");
                            std::io::stdout().flush().ok();
                        } else {
                            buffer.push_str(&fragment);
                            while let Some(pos) = buffer.find('\n') {
                                let line: String = buffer.drain(..=pos).collect();
                                if !line.trim().is_empty() {
                                    skin.print_text(&line);
                                }
                            }
                        }
                    }
                    Some(Err(e)) => return Err(e),
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                return Ok(());
            }
        }
    }
    if raw {
        println!();
    } else if !buffer.trim().is_empty() {
        skin.print_text(&buffer);
    }
    Ok(())
}

fn clear_screen() {
    let mut stdout = std::io::stdout();
    let _ = execute!(stdout, Clear(ClearType::All), MoveTo(0, 0));
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "joao=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
