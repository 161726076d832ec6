const MAX_SUMMARY_SENTENCES: usize = 10;

/// System instructions for the model when rebuilding the rolling summary.
pub fn build_summary_system_prompt() -> String {
    "You are a diligent note-taker who maintains a concise recap of a chat \
     between Harry Potter and a guest."
        .to_string()
}

/// User payload describing the latest turn and the previous summary.
pub fn build_summary_user_prompt(
    previous_summary: Option<&str>,
    user_message: &str,
    assistant_reply: &str,
) -> String {
    let prior = previous_summary
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("No prior summary available.");

    [
        "You maintain a rolling summary of a conversation with Harry Potter.".to_string(),
        format!(
            "Rewrite the summary from scratch using at most {} sentences.",
            MAX_SUMMARY_SENTENCES
        ),
        "Capture the emotional tone only when it affects future turns.".to_string(),
        "Avoid bullet points, numbered lists, or JSON. Respond with plain sentences.".to_string(),
        format!("Previous summary:\n{}", prior),
        format!("Latest guest message:\n{}", user_message),
        format!("Harry's latest reply:\n{}", assistant_reply),
        "Return the refreshed summary now.".to_string(),
    ]
    .join("\n\n")
}
