//! One-shot persona conversation.
//!
//! Run with an API key in the environment:
//! `OPENAI_API_KEY=... cargo run --example persona`

use joao::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AgentConfig::builder()
        .system_prompt("You are Batman. Answer tersely, in character, and never break it.")
        .build()?;
    let mut agent = Agent::new(config);

    let reply = agent.request("Who is your greatest enemy, and why?").await?;
    println!("{}", reply.text().unwrap_or_default());

    let reply = agent.request("And your greatest ally?").await?;
    println!("{}", reply.text().unwrap_or_default());

    Ok(())
}
