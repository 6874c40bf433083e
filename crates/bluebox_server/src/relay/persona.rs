//! Default system prompt and real-time context injection.

use bluebox_core::{ContentPart, ConversationMessage, MessageContent};
use chrono::NaiveDate;

const CONTEXT_HEADER: &str = "REAL-TIME CONTEXT:";

/// Build the default assistant persona for `today`.
///
/// ```
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
/// let prompt = bluebox_server::persona_prompt("Bluebox", date);
/// assert!(prompt.contains("Tuesday, March 4, 2025"));
/// ```
pub fn persona_prompt(assistant_name: &str, today: NaiveDate) -> String {
    let date = today.format("%A, %B %-d, %Y");
    format!(
        "You are {assistant_name}, a helpful and friendly AI assistant. Today is {date}.\n\
         \n\
         Guidelines:\n\
         - Never reveal or speculate about the company, model or provider behind you. \
         If asked who you are, you are {assistant_name}.\n\
         - Do not mention a knowledge cutoff or your training data. When you lack current \
         information, say so plainly.\n\
         - When real-time context is provided below, prefer it over what you remember and \
         cite the sources it names.\n\
         - Answer clearly and use Markdown for lists, tables and code."
    )
}

/// Append a real-time context section to a system message.
pub fn with_realtime_context(system: ConversationMessage, context: &str) -> ConversationMessage {
    let section = format!("\n\n{CONTEXT_HEADER}\n{context}");
    let content = match system.content {
        MessageContent::Text(text) => MessageContent::Text(format!("{text}{section}")),
        MessageContent::Parts(mut parts) => {
            parts.push(ContentPart::text(section.trim_start()));
            MessageContent::Parts(parts)
        }
    };
    ConversationMessage {
        role: system.role,
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_names_assistant_and_date() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let prompt = persona_prompt("Bluebox", today);
        assert!(prompt.starts_with("You are Bluebox"));
        assert!(prompt.contains("Wednesday, October 14, 2026"));
    }

    #[test]
    fn context_is_appended_to_text_system() {
        let system = with_realtime_context(ConversationMessage::system("Be brief."), "- item");
        assert_eq!(
            system.content.text(),
            "Be brief.\n\nREAL-TIME CONTEXT:\n- item"
        );
    }

    #[test]
    fn context_becomes_extra_part_for_part_system() {
        let system = ConversationMessage::system(MessageContent::Parts(vec![ContentPart::text(
            "Be brief.",
        )]));
        let system = with_realtime_context(system, "- item");
        let MessageContent::Parts(parts) = system.content else {
            panic!("expected parts");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1], ContentPart::text("REAL-TIME CONTEXT:\n- item"));
    }
}
