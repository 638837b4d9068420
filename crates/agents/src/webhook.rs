//! Inbound WhatsApp command parser. Recognizes a `yield` command and a
//! `help` command over the raw message body; anything else gets the
//! greeting hint. The reply is plain text; the transport envelope is
//! applied by the HTTP layer.

use agro_core::prediction::run_yield_command;

const USAGE_SHAPE: &str =
    "Please provide district, area, and soil type. Example: yield Lucknow 5 alluvial";
const USAGE_INVALID: &str =
    "Invalid input. Use: yield <district> <area> <soil> (e.g., yield Lucknow 5 alluvial)";
const USAGE_HELP: &str =
    "Send \"yield <district> <area> <soil>\" to predict yield. Example: yield Lucknow 5 alluvial";
const GREETING_HINT: &str =
    "Hi! Send \"help\" for instructions or \"yield\" to predict sugarcane yield.";

pub fn inbound_reply(body: &str) -> String {
    let incoming = body.trim().to_lowercase();

    if incoming.starts_with("yield") {
        let tokens: Vec<&str> = incoming.split_whitespace().skip(1).collect();
        if tokens.len() != 3 {
            return USAGE_SHAPE.to_string();
        }
        return match run_yield_command(&tokens) {
            Ok(total) => format!("Predicted yield: {total} quintals"),
            Err(_) => USAGE_INVALID.to_string(),
        };
    }

    if incoming.contains("help") {
        return USAGE_HELP.to_string();
    }

    GREETING_HINT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yield_command_predicts() {
        assert_eq!(
            inbound_reply("yield Lucknow 5 alluvial"),
            "Predicted yield: 518 quintals"
        );
    }

    #[test]
    fn yield_command_with_wrong_token_count_prompts_usage() {
        assert_eq!(inbound_reply("yield Lucknow 5"), USAGE_SHAPE);
        assert_eq!(inbound_reply("yield"), USAGE_SHAPE);
    }

    #[test]
    fn yield_command_with_unknown_keys_is_invalid() {
        assert_eq!(inbound_reply("yield Atlantis 5 alluvial"), USAGE_INVALID);
        assert_eq!(inbound_reply("yield Lucknow 5 volcanic"), USAGE_INVALID);
    }

    #[test]
    fn help_and_default_paths() {
        assert_eq!(inbound_reply("help me"), USAGE_HELP);
        assert_eq!(inbound_reply("hello there"), GREETING_HINT);
    }
}
