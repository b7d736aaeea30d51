//! Heuristic gate for the default engineering standards block.

use std::sync::OnceLock;

use regex::Regex;

/// Prompts matching any of these are simple enough to skip the standards
/// block. All patterns are anchored at the start.
fn skip_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // Shell-style listing and short questions
            r"(?i)^(ls|dir|pwd|cd|cat|grep|find|which|what|where|who|when|how much|how many)\b",
            // Show/list/get requests
            r"(?i)^(show|list|display|get|fetch)\s+",
            // Quick question
            r"^\?",
            // Greetings
            r"(?i)^(hi|hello|hey|thanks|thank you|bye)\b",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid skip pattern"))
        .collect()
    })
}

/// Whether the default engineering standards should be injected for this
/// (already flag-stripped) prompt.
pub fn should_apply_defaults(prompt: &str) -> bool {
    !skip_patterns().iter().any(|p| p.is_match(prompt))
}
