use serde::{Deserialize, Serialize};

/// Closed set of sentiment labels the avatar can animate.
///
/// The LLM output is validated against this enum; a value outside the set is
/// a contract violation, never silently defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Happy,
    Funny,
    Sad,
    Surprised,
    Angry,
    Crazy,
}

impl Sentiment {
    /// All accepted labels, in the order shown to the model.
    pub const ALL: [Sentiment; 6] = [
        Sentiment::Happy,
        Sentiment::Funny,
        Sentiment::Sad,
        Sentiment::Surprised,
        Sentiment::Angry,
        Sentiment::Crazy,
    ];

    /// Wire label for this sentiment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Happy => "happy",
            Sentiment::Funny => "funny",
            Sentiment::Sad => "sad",
            Sentiment::Surprised => "surprised",
            Sentiment::Angry => "angry",
            Sentiment::Crazy => "crazy",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&Sentiment::Surprised).unwrap();
        assert_eq!(json, "\"surprised\"");
        let back: Sentiment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Sentiment::Surprised);
    }

    #[test]
    fn test_rejects_unknown_label() {
        let result: Result<Sentiment, _> = serde_json::from_str("\"bored\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_all_matches_labels() {
        let labels: Vec<&str> = Sentiment::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            labels,
            vec!["happy", "funny", "sad", "surprised", "angry", "crazy"]
        );
    }
}
