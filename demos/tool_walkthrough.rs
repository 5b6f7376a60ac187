//! Tool-calling walkthrough: the model requests a local function, the
//! result is fed back, and the final answer is printed.
//!
//! Run with an API key in the environment:
//! `OPENAI_API_KEY=... cargo run --example tool_walkthrough`

use std::sync::Arc;

use joao::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AgentConfig::builder()
        .system_prompt("You are a precise assistant. Use the provided tools for arithmetic.")
        .build()?;
    let mut agent = Agent::new(config);

    let add = FnTool::new(
        ToolSpec::builder("add")
            .description("Add two integers and return the sum")
            .integer("a", "First operand", true)
            .integer("b", "Second operand", true)
            .build(),
        |args| async move {
            let sum = args.get_i64("a")? + args.get_i64("b")?;
            Ok(serde_json::json!(sum))
        },
    );
    let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(add)];

    let reply = agent
        .request_with_tools("What is 20351 + 7893?", &tools, true)
        .await?;
    match reply {
        Reply::Text(text) => println!("{text}"),
        Reply::ToolCalls(calls) => {
            // auto_use_tools was on, so this only happens when the model
            // asks for something we did not register.
            for call in calls {
                println!("unhandled tool call: {} {}", call.name, call.arguments);
            }
        }
    }

    Ok(())
}
