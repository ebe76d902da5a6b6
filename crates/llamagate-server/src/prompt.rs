//! Prompt assembly: turning user input or a structured message sequence,
//! plus a configuration's template, into the single string the engine
//! accepts.
//!
//! The engine takes one prompt per call, so multi-turn conversations are
//! flattened: the last `system` message becomes the preamble, `user`
//! messages accumulate into one user turn, and `assistant` messages are
//! inlined as `Assistant: ... / User: ` markers inside that turn.

use crate::models::ChatMessage;

/// Substitution marker templates must contain.
pub const USER_INPUT_MARKER: &str = "{USER_INPUT}";

/// System preamble used when no `system` message is given.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Build a prompt from a single user string.
///
/// A non-empty template is used even if it lacks the marker (the
/// substitution is then a no-op and the template text goes through
/// verbatim); otherwise the fixed three-part fallback applies.
pub fn build_single_turn(user_input: &str, template: Option<&str>) -> String {
    match template {
        Some(t) if !t.is_empty() => t.replace(USER_INPUT_MARKER, user_input),
        _ => fallback_prompt(DEFAULT_SYSTEM_PROMPT, user_input),
    }
}

/// Flatten a message sequence into a prompt.
///
/// For the multi-turn path the template is only honored when it actually
/// contains the marker; a marker-less template cannot carry the
/// conversation and falls through to the fixed format.
pub fn build_from_messages(messages: &[ChatMessage], template: Option<&str>) -> String {
    let mut system_prompt = DEFAULT_SYSTEM_PROMPT.to_string();
    let mut user_turn = String::new();

    for message in messages {
        match message.role.as_str() {
            "system" => {
                // Last system message wins.
                system_prompt = message.content.clone();
            }
            "user" => {
                // An inlined assistant turn already ends with "User: ",
                // so the content attaches directly to that marker.
                if !user_turn.is_empty() && !user_turn.ends_with("User: ") {
                    user_turn.push('\n');
                }
                user_turn.push_str(&message.content);
            }
            "assistant" => {
                if !user_turn.is_empty() {
                    user_turn.push_str("\nAssistant: ");
                    user_turn.push_str(&message.content);
                    user_turn.push_str("\nUser: ");
                }
            }
            _ => {}
        }
    }

    match template {
        Some(t) if !t.is_empty() && t.contains(USER_INPUT_MARKER) => {
            t.replace(USER_INPUT_MARKER, &user_turn)
        }
        _ => fallback_prompt(&system_prompt, &user_turn),
    }
}

fn fallback_prompt(system: &str, user: &str) -> String {
    format!("<|system|>\n{system}\n<|user|>\n{user}\n<|assistant|>\n")
}
