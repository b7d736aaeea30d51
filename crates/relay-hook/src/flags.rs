//! Flag token extraction from prompt boundaries.
//!
//! Flags are dash-prefixed words (`-u`, `-think_hard`) placed at the end
//! and/or the start of a prompt:
//!
//! ```
//! use relay_hook::flags::parse_flags;
//!
//! let parsed = parse_flags("fix bug -u -debug");
//! assert_eq!(parsed.flags, vec!["u", "debug"]);
//! assert_eq!(parsed.clean_prompt, "fix bug");
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// A run of flags anchored to the end of the prompt. Each flag must be
/// preceded by whitespace, so a prompt made only of flags is left for the
/// leading pass.
static TRAILING_FLAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\s+-[A-Za-z_]+)+$").expect("Invalid trailing flags regex")
});

/// A run of flags anchored to the start, followed by whitespace or the end.
static LEADING_FLAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-[A-Za-z_]+(?:\s+-[A-Za-z_]+)*)(?:\s+|$)")
        .expect("Invalid leading flags regex")
});

static FLAG_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-([A-Za-z_]+)").expect("Invalid flag token regex"));

/// A prompt split into its text and the flags found around it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedPrompt {
    /// Prompt text with boundary flags removed.
    pub clean_prompt: String,
    /// Flag identifiers without the dash, first-seen order. Flags differing
    /// only in case count as duplicates; the first spelling is kept.
    pub flags: Vec<String>,
}

fn push_unique(flags: &mut Vec<String>, run: &str) {
    for caps in FLAG_TOKEN.captures_iter(run) {
        let flag = &caps[1];
        if !flags.iter().any(|f| f.eq_ignore_ascii_case(flag)) {
            flags.push(flag.to_string());
        }
    }
}

/// Extract trailing flags, then leading flags, from a prompt.
///
/// Trailing flags come first in the returned list. A flag present at both
/// ends is only listed once, at its trailing position.
pub fn parse_flags(prompt: &str) -> ParsedPrompt {
    let mut flags = Vec::new();
    let mut clean = prompt;

    if let Some(m) = TRAILING_FLAGS.find(clean) {
        push_unique(&mut flags, m.as_str());
        clean = clean[..m.start()].trim_end();
    }

    if let Some(caps) = LEADING_FLAGS.captures(clean) {
        push_unique(&mut flags, &caps[1]);
        let consumed = caps.get(0).map_or(0, |m| m.end());
        clean = clean[consumed..].trim_start();
    }

    ParsedPrompt {
        clean_prompt: clean.to_string(),
        flags,
    }
}
