use serde::Deserialize;

use crate::error::{ChatError, ChatResult};
use harry_core::Sentiment;

/// Structured contract the model must emit for every turn.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsedReply {
    pub text: String,
    pub sentiment: Sentiment,
}

/// Parse the model output into the `{text, sentiment}` contract.
///
/// Tolerates markdown code fences and surrounding prose; any parse or schema
/// failure (including an out-of-set sentiment) is one provider-contract
/// violation as far as the caller is concerned.
pub fn parse_structured_reply(raw: &str) -> ChatResult<ParsedReply> {
    extract_json_object(raw)
        .and_then(|json| serde_json::from_str::<ParsedReply>(json).ok())
        .ok_or_else(|| ChatError::Provider("Gemini returned an invalid response.".to_string()))
}

/// Slice out the outermost JSON object, ignoring fences and chatter.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_plain_json() {
        let parsed = parse_structured_reply(r#"{"text":"Hello there","sentiment":"happy"}"#)
            .unwrap();
        assert_eq!(parsed.text, "Hello there");
        assert_eq!(parsed.sentiment, Sentiment::Happy);
    }

    #[test]
    fn test_parses_fenced_json() {
        let raw = "```json\n{\"text\":\"Brilliant!\",\"sentiment\":\"surprised\"}\n```";
        let parsed = parse_structured_reply(raw).unwrap();
        assert_eq!(parsed.text, "Brilliant!");
        assert_eq!(parsed.sentiment, Sentiment::Surprised);
    }

    #[test]
    fn test_rejects_unknown_sentiment() {
        let result = parse_structured_reply(r#"{"text":"Hi","sentiment":"bored"}"#);
        assert!(matches!(result, Err(ChatError::Provider(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let result = parse_structured_reply("not json at all");
        assert!(matches!(result, Err(ChatError::Provider(_))));
    }

    #[test]
    fn test_rejects_missing_fields() {
        let result = parse_structured_reply(r#"{"text":"Hi"}"#);
        assert!(matches!(result, Err(ChatError::Provider(_))));
    }
}
