//! Prompt text sent to the completion model, and chat-turn chunks built
//! from a finished exchange.

use uuid::Uuid;

use crate::structs::scenario::ScenarioChunk;

/// Replies longer than this (in UTF-16 code units, after trimming) are worth compacting
/// before they are stored as a chat-turn chunk.
pub const COMPACT_MIN_CHARS: usize = 800;
pub const DEFAULT_COMPACT_TARGET_TOKENS: u32 = 128;

const CHAT_TURN_PREFIX: &str = "Chat Turn";

/// `[Context]` block of `- title: body` lines, then `[Task]` and the prompt.
pub fn build_input_text(prompt: &str, context: &[ScenarioChunk]) -> String {
    let mut lines = Vec::with_capacity(context.len() + 4);
    lines.push("[Context]".to_string());
    for c in context {
        lines.push(format!("- {}: {}", c.title, c.body));
    }
    lines.push(String::new());
    lines.push("[Task]".to_string());
    lines.push(prompt.to_string());
    lines.join("\n")
}

pub fn build_compact_prompt(text: &str, target_tokens: u32) -> String {
    format!(
        "Compress the following assistant reply to approximately {target_tokens} tokens \
         while preserving key facts and intent. Use clear, readable wording.\n\n\
         --- BEGIN REPLY ---\n{text}\n--- END REPLY ---"
    )
}

/// True when `reply` is long enough that compaction should be attempted.
pub fn should_compact(reply: &str) -> bool {
    reply.trim().encode_utf16().count() > COMPACT_MIN_CHARS
}

/// Id for a chunk created at runtime, e.g. `usr-3f2a9c1b7d4e`.
pub fn new_user_chunk_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("usr-{}", &hex[..12])
}

/// Turns a prompt/reply pair into a context chunk numbered after the chat
/// turns already present in `existing`. `None` when the reply is blank.
pub fn build_chat_turn(
    prompt: &str,
    reply: &str,
    existing: &[ScenarioChunk],
) -> Option<ScenarioChunk> {
    let reply = reply.trim();
    if reply.is_empty() {
        return None;
    }
    let prompt = prompt.trim();

    let mut parts = Vec::with_capacity(2);
    if !prompt.is_empty() {
        parts.push(format!("User: {prompt}"));
    }
    parts.push(format!("\nAssistant: {reply}"));

    let turn = existing
        .iter()
        .filter(|c| c.title.starts_with(CHAT_TURN_PREFIX))
        .count()
        + 1;

    Some(ScenarioChunk {
        id: new_user_chunk_id(),
        title: format!("{CHAT_TURN_PREFIX} {turn}: User + Assistant"),
        body: parts.join("\n\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(title: &str) -> ScenarioChunk {
        ScenarioChunk {
            id: "x".into(),
            title: title.into(),
            body: String::new(),
        }
    }

    #[test]
    fn input_text_layout() {
        let ctx = vec![
            ScenarioChunk {
                id: "1".into(),
                title: "Plan sheet".into(),
                body: "Starter: 5 GB".into(),
            },
            ScenarioChunk {
                id: "2".into(),
                title: "Persona".into(),
                body: "Be concise".into(),
            },
        ];
        assert_eq!(
            build_input_text("Pick a plan", &ctx),
            "[Context]\n- Plan sheet: Starter: 5 GB\n- Persona: Be concise\n\n[Task]\nPick a plan"
        );
        assert_eq!(build_input_text("Hi", &[]), "[Context]\n\n[Task]\nHi");
    }

    #[test]
    fn compact_prompt_wraps_reply() {
        let p = build_compact_prompt("long answer", 128);
        assert!(p.starts_with("Compress the following assistant reply to approximately 128 tokens"));
        assert!(p.ends_with("--- BEGIN REPLY ---\nlong answer\n--- END REPLY ---"));
    }

    #[test]
    fn compaction_threshold() {
        assert!(!should_compact(&"a".repeat(COMPACT_MIN_CHARS)));
        assert!(should_compact(&"a".repeat(COMPACT_MIN_CHARS + 1)));
        assert!(!should_compact(&format!("  {}  ", "a".repeat(COMPACT_MIN_CHARS))));
    }

    #[test]
    fn compaction_threshold_counts_utf16_units() {
        // Each emoji is one char but two UTF-16 units.
        let half = COMPACT_MIN_CHARS / 2;
        assert!(!should_compact(&"😀".repeat(half)));
        assert!(should_compact(&"😀".repeat(half + 1)));
        assert!(!should_compact(&"é".repeat(COMPACT_MIN_CHARS)));
    }

    #[test]
    fn chat_turn_numbering_and_body() {
        let existing = vec![chunk("Chat Turn 1: User + Assistant"), chunk("Plan sheet")];
        let turn = build_chat_turn(" Which plan? ", " Plus. ", &existing).unwrap();
        assert_eq!(turn.title, "Chat Turn 2: User + Assistant");
        assert_eq!(turn.body, "User: Which plan?\n\n\nAssistant: Plus.");
        assert!(turn.id.starts_with("usr-"));
        assert_eq!(turn.id.len(), 16);
    }

    #[test]
    fn chat_turn_without_prompt_or_reply() {
        let turn = build_chat_turn("", "Only reply", &[]).unwrap();
        assert_eq!(turn.title, "Chat Turn 1: User + Assistant");
        assert_eq!(turn.body, "\nAssistant: Only reply");
        assert!(build_chat_turn("q", "   ", &[]).is_none());
    }

    #[test]
    fn user_chunk_ids_are_unique() {
        assert_ne!(new_user_chunk_id(), new_user_chunk_id());
    }
}
