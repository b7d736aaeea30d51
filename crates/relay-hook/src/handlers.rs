//! Flag handlers and the directive text they inject.

use std::path::Path;

use crate::context::project_context;

/// A behavior selected by one or more flag aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagHandler {
    /// Maximum thinking budget.
    Ultrathink,
    /// Enhanced thinking.
    ThinkHard,
    /// Step-by-step thinking.
    Think,
    /// Principal engineering standards.
    EngineeringStandards,
    /// Clean code principles.
    Clean,
    /// Plan before implementing.
    Plan,
    /// Verbose explanations.
    Verbose,
    /// Security focus.
    Security,
    /// Comprehensive tests.
    Test,
    /// Detailed documentation.
    Doc,
    /// Performance focus.
    Perf,
    /// Critical review.
    Review,
    /// Refactor for clarity.
    Refactor,
    /// Systematic debugging.
    Debug,
    /// API design practices.
    Api,
    /// Ask instead of guessing.
    NoGuess,
    /// Detected project ecosystems.
    Context,
    /// Flag reference.
    Help,
}

/// Flag alias table. Lookups are case-insensitive.
const FLAG_ALIASES: &[(&str, FlagHandler)] = &[
    // Thinking modes
    ("u", FlagHandler::Ultrathink),
    ("ultrathink", FlagHandler::Ultrathink),
    ("th", FlagHandler::ThinkHard),
    ("think_hard", FlagHandler::ThinkHard),
    ("t", FlagHandler::Think),
    ("think", FlagHandler::Think),
    // Quality modes
    ("e", FlagHandler::EngineeringStandards),
    ("eng", FlagHandler::EngineeringStandards),
    ("standards", FlagHandler::EngineeringStandards),
    ("clean", FlagHandler::Clean),
    // Development modes
    ("p", FlagHandler::Plan),
    ("plan", FlagHandler::Plan),
    ("v", FlagHandler::Verbose),
    ("verbose", FlagHandler::Verbose),
    ("s", FlagHandler::Security),
    ("sec", FlagHandler::Security),
    ("security", FlagHandler::Security),
    ("test", FlagHandler::Test),
    ("doc", FlagHandler::Doc),
    ("perf", FlagHandler::Perf),
    ("review", FlagHandler::Review),
    ("refactor", FlagHandler::Refactor),
    ("debug", FlagHandler::Debug),
    ("api", FlagHandler::Api),
    ("no_guess", FlagHandler::NoGuess),
    ("ng", FlagHandler::NoGuess),
    // Context
    ("ctx", FlagHandler::Context),
    ("context", FlagHandler::Context),
    // Help
    ("hh", FlagHandler::Help),
    ("hhelp", FlagHandler::Help),
];

const ULTRATHINK: &str = "Use the maximum amount of ultrathink. Take all the time you need. \
It's much better if you do too much research and thinking than not enough.";

const ENGINEERING_STANDARDS: &str = "Follow the project's principal engineering standards. \
No shortcuts, stubs, or hardcoded values. We build it right the first time: clean, robust, \
and production ready. No halfway measures.

Keep it tight. Use the simplest solution that meets the need with high quality. Do not \
overengineer. Do not create new files, layers, or abstractions unless they are clearly \
necessary. Every line of code should earn its place. Simplicity is earned through \
understanding, not guesswork.

Make it clean. Make it count.

If you encounter uncertainty, lack context, or are not confident in the solution, stop. \
Do not guess or make things up. It is not only okay, it is expected, to ask for \
clarification or help. Excellence includes knowing when to pause.";

const THINK_HARD: &str = "Think hard about this problem. Consider multiple approaches and \
evaluate trade-offs before implementing.";

const THINK: &str = "Think step by step through this problem before implementing.";

const PLAN: &str = "Create a detailed plan before starting implementation. Break down the \
task into clear steps and identify potential challenges.";

const VERBOSE: &str = "Be verbose in your explanations. Include detailed comments explaining \
the why behind decisions, not just the what.";

const SECURITY: &str = "Focus on security best practices. Consider potential \
vulnerabilities, input validation, authentication, and data protection.";

const TEST: &str = "Include comprehensive unit tests for all functionality. Follow TDD \
principles where appropriate. Tests should be clear, focused, and cover edge cases.";

const DOC: &str = "Provide detailed documentation with examples. Include docstrings, type \
hints, and usage examples. Documentation should be clear to someone unfamiliar with the \
codebase.";

const PERF: &str = "Optimize for performance. Consider algorithmic complexity, memory usage, \
and potential bottlenecks. Include benchmarks where relevant.";

const REVIEW: &str = "Review this code critically. Look for bugs, code smells, performance \
issues, security vulnerabilities, and suggest improvements. Be thorough but constructive.";

const REFACTOR: &str = "Refactor for clarity and maintainability. Improve naming, reduce \
complexity, eliminate duplication, and enhance readability without changing functionality.";

const DEBUG: &str = "Debug systematically. Add logging, check assumptions, trace execution \
flow, and identify the root cause before proposing fixes.";

const API: &str = "Follow REST/GraphQL best practices. Design clear, consistent, and \
well-documented APIs. Consider versioning, error handling, and client developer experience.";

const CLEAN: &str = "Apply clean code principles: meaningful names, small functions, single \
responsibility, DRY, and SOLID principles. Code should be self-documenting.";

const NO_GUESS: &str = "Do not guess or make assumptions. If something is unclear or you \
lack necessary context, stop and ask for clarification. It's better to ask than to \
implement incorrectly.";

const HELP: &str = r#"The user has just asked for help understanding the UserPromptSubmit hooks. Please display the following help message:
Here are all available UserPromptSubmit hook flags:

🧠 THINKING MODES
- -u, -ultrathink    Maximum thinking budget (31,999 tokens) for complex problems
- -th, -think_hard   Enhanced thinking for challenging tasks
- -t, -think         Step-by-step thinking for standard problems

🏗️ QUALITY & STANDARDS
- -e, -eng, -standards    Apply engineering standards (no shortcuts, production-ready)
- -clean                  Follow clean code principles (SOLID, DRY, meaningful names)

💻 DEVELOPMENT MODES
- -p, -plan          Create detailed plan before implementation
- -v, -verbose       Include verbose explanations and detailed comments
- -s, -sec, -security    Focus on security best practices
- -test              Include comprehensive unit tests
- -doc               Provide detailed documentation with examples
- -perf              Optimize for performance with benchmarks
- -review            Critical code review mode
- -refactor          Refactor for clarity and maintainability
- -debug             Systematic debugging approach
- -api               API design best practices

🔧 OTHER OPTIONS
- -ng, -no_guess     Never guess; ask for clarification instead
- -ctx, -context     Include project context (package managers, tools)
- -hh, -hhelp        Show this help message

💡 COMMON COMBINATIONS
Complex problem:     -u -p        (ultrathink + plan)
Production feature:  -e -test -doc (standards + tests + docs)
Code review:        -review -u    (review + deep thinking)
Quick fix:          (no flags - skips engineering standards)
Debug issue:        -debug -v -u  (debug + verbose + ultrathink)

Note: Engineering standards (-e) are auto-applied for substantial work unless you're asking simple questions."#;

impl FlagHandler {
    /// Look up the handler for a flag identifier, ignoring case.
    pub fn lookup(flag: &str) -> Option<Self> {
        FLAG_ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(flag))
            .map(|(_, handler)| *handler)
    }

    /// All aliases that select this handler.
    pub fn aliases(self) -> impl Iterator<Item = &'static str> {
        FLAG_ALIASES
            .iter()
            .filter(move |(_, handler)| *handler == self)
            .map(|(alias, _)| *alias)
    }

    /// Render the text block for this handler.
    ///
    /// Only [`FlagHandler::Context`] looks at `working_dir`; it returns an
    /// empty string when no ecosystem is detected there.
    pub fn render(self, working_dir: &Path) -> String {
        let text = match self {
            Self::Ultrathink => ULTRATHINK,
            Self::ThinkHard => THINK_HARD,
            Self::Think => THINK,
            Self::EngineeringStandards => ENGINEERING_STANDARDS,
            Self::Clean => CLEAN,
            Self::Plan => PLAN,
            Self::Verbose => VERBOSE,
            Self::Security => SECURITY,
            Self::Test => TEST,
            Self::Doc => DOC,
            Self::Perf => PERF,
            Self::Review => REVIEW,
            Self::Refactor => REFACTOR,
            Self::Debug => DEBUG,
            Self::Api => API,
            Self::NoGuess => NO_GUESS,
            Self::Help => HELP,
            Self::Context => return project_context(working_dir).unwrap_or_default(),
        };
        text.to_string()
    }
}
