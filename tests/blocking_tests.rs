//! Blocking facade: same semantics as the async agent, synchronous calls.

mod common;

use std::sync::Arc;

use common::{test_config, test_config_with_system, MockTransport};
use joao::agent::BlockingAgent;
use joao::types::Role;

#[test]
fn blocking_request_returns_text() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_text("4");

    let mut agent =
        BlockingAgent::with_transport(test_config_with_system("You are helpful"), transport)
            .unwrap();
    let reply = agent.request("2+2?").unwrap();
    assert_eq!(reply.into_text().as_deref(), Some("4"));
}

#[test]
fn blocking_stream_iterates_fragments_and_commits() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_text("streamed text from the blocking side");

    let mut agent = BlockingAgent::with_transport(test_config(), transport).unwrap();
    let stream = agent.stream("go").unwrap();
    let fragments: Vec<String> = stream.map(|f| f.unwrap()).collect();

    assert!(fragments.len() > 1);
    assert_eq!(
        fragments.concat(),
        "streamed text from the blocking side"
    );

    let messages = agent.history().snapshot();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[1].text(), "streamed text from the blocking side");
}

#[test]
fn blocking_reset_matches_async_semantics() {
    let transport = Arc::new(MockTransport::new());
    transport.queue_text("hello");

    let mut agent =
        BlockingAgent::with_transport(test_config_with_system("old"), transport).unwrap();
    agent.request("hi").unwrap();
    agent.reset(Some("new"));

    let messages = agent.history().snapshot();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text(), "new");
}
