//! History invariants.

use joao::history::History;
use joao::types::{Message, Role};

#[test]
fn new_history_seeds_system_message_first() {
    let history = History::new(Some("be brief"));
    let messages = history.snapshot();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[0].text(), "be brief");
}

#[test]
fn snapshot_preserves_append_order() {
    let mut history = History::new(Some("sys"));
    history.push(Message::user("q1"));
    history.push(Message::assistant("a1"));
    history.push(Message::user("q2"));

    let snapshot = history.snapshot();
    let texts: Vec<&str> = snapshot.iter().map(|m| m.text()).collect();
    assert_eq!(texts, vec!["sys", "q1", "a1", "q2"]);
}

#[test]
fn at_most_one_system_message_always_first() {
    let mut history = History::new(None);
    history.push(Message::user("hello"));
    history.push(Message::system("late system prompt"));
    history.push(Message::assistant("hi"));
    history.push(Message::system("even later"));

    let messages = history.snapshot();
    let system_count = messages.iter().filter(|m| m.role == Role::System).count();
    assert_eq!(system_count, 1);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[0].text(), "even later");
}

#[test]
fn reset_discards_turns_and_keeps_system() {
    let mut history = History::new(Some("sys"));
    history.push(Message::user("q"));
    history.push(Message::assistant("a"));
    history.push_tool_result("id-1", "add", "5");

    history.reset(None);
    let messages = history.snapshot();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text(), "sys");
}

#[test]
fn reset_replaces_system_when_given() {
    let mut history = History::new(Some("old"));
    history.push(Message::user("q"));

    history.reset(Some("new"));
    assert_eq!(history.system_prompt(), Some("new"));
    assert_eq!(history.len(), 1);
}

#[test]
fn reset_is_idempotent() {
    let mut history = History::new(Some("sys"));
    history.push(Message::user("q"));

    history.reset(None);
    let first = history.snapshot();
    history.reset(None);
    let second = history.snapshot();
    assert_eq!(first, second);
}

#[test]
fn reset_on_empty_history_never_errors() {
    let mut history = History::new(None);
    history.reset(None);
    assert!(history.is_empty());
    history.reset(Some("now seeded"));
    assert_eq!(history.len(), 1);
}

#[test]
fn tool_result_turn_carries_call_metadata() {
    let mut history = History::new(None);
    history.push_tool_result("call_7", "lookup", "result text");

    let messages = history.snapshot();
    assert_eq!(messages[0].role, Role::Tool);
    assert_eq!(messages[0].tool_call_id.as_deref(), Some("call_7"));
    assert_eq!(messages[0].name.as_deref(), Some("lookup"));
    assert_eq!(messages[0].text(), "result text");
}
