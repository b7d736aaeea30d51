//! Context injected regardless of flags, and project ecosystem detection.

use std::io;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeZone};
use tracing::debug;

/// Longest wait for the branch lookup before it is abandoned.
const GIT_TIMEOUT: Duration = Duration::from_secs(2);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Python project markers.
const PYTHON_MARKERS: &[&str] = &["pyproject.toml", "setup.py", "requirements.txt", "environment.yml"];

/// Python tooling markers, in display order.
const PYTHON_TOOLS: &[(&str, &str)] = &[
    ("uv.lock", "uv"),
    ("poetry.lock", "Poetry"),
    ("Pipfile.lock", "Pipenv"),
    (".venv", "venv"),
    ("conda-meta", "Conda"),
];

/// Node.js lockfiles, first match wins.
const NODE_LOCKFILES: &[(&str, &str)] = &[
    ("yarn.lock", "Yarn"),
    ("pnpm-lock.yaml", "pnpm"),
    ("bun.lockb", "Bun"),
];

/// Single-marker ecosystems.
const ECOSYSTEMS: &[(&str, &str)] = &[
    ("Cargo.toml", "Rust"),
    ("go.mod", "Go"),
    ("pom.xml", "Java (Maven)"),
    ("build.gradle", "Java (Gradle)"),
    ("Gemfile", "Ruby"),
    ("composer.json", "PHP"),
    ("mix.exs", "Elixir"),
    ("project.clj", "Clojure"),
];

/// Format a date as `October 17, 2026`.
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%B %-d, %Y").to_string()
}

/// The `[Current Date: ...]` block.
pub fn date_block<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("[Current Date: {}]", format_date(date))
}

/// The `[Git Branch: ...]` block.
pub fn branch_block(branch: &str) -> String {
    format!("[Git Branch: {}]", branch)
}

/// Current git branch of `dir`, if it is inside a repository with a branch
/// checked out. Any git failure, or no answer within two seconds, yields
/// `None`.
pub fn current_branch(dir: &Path) -> Option<String> {
    let mut command = Command::new("git");
    command
        .args(["branch", "--show-current"])
        .current_dir(dir)
        .env("GIT_OPTIONAL_LOCKS", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    let output = match output_within(command, GIT_TIMEOUT) {
        Ok(Some(o)) if o.status.success() => o,
        Ok(Some(o)) => {
            debug!(status = %o.status, "git branch lookup failed");
            return None;
        }
        Ok(None) => {
            debug!(timeout_ms = GIT_TIMEOUT.as_millis() as u64, "git branch lookup timed out");
            return None;
        }
        Err(e) => {
            debug!(error = %e, "git not available");
            return None;
        }
    };

    let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!branch.is_empty()).then_some(branch)
}

/// Run `command` to completion, killing it once `timeout` has passed.
///
/// Returns `Ok(None)` on timeout. Output is only read after exit, so this
/// suits commands that print a few lines at most.
fn output_within(mut command: Command, timeout: Duration) -> io::Result<Option<Output>> {
    let mut child = command.spawn()?;
    let deadline = Instant::now() + timeout;

    loop {
        if child.try_wait()?.is_some() {
            return child.wait_with_output().map(Some);
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Detect the ecosystems used by the project in `dir`.
pub fn detect_ecosystems(dir: &Path) -> Vec<String> {
    let exists = |name: &str| dir.join(name).exists();
    let mut found = Vec::new();

    if PYTHON_MARKERS.iter().any(|m| exists(*m)) {
        let tools: Vec<&str> = PYTHON_TOOLS
            .iter()
            .filter(|(marker, _)| exists(*marker))
            .map(|(_, tool)| *tool)
            .collect();
        if tools.is_empty() {
            found.push("Python".to_string());
        } else {
            found.push(format!("Python ({})", tools.join(", ")));
        }
    }

    if exists("package.json") {
        let manager = NODE_LOCKFILES
            .iter()
            .find(|(lockfile, _)| exists(*lockfile))
            .map_or("npm", |(_, manager)| *manager);
        found.push(format!("Node.js ({})", manager));
    }

    for (marker, ecosystem) in ECOSYSTEMS {
        if exists(*marker) {
            found.push((*ecosystem).to_string());
        }
    }

    found
}

/// The `[Project Context: ...]` block, or `None` when nothing is detected.
pub fn project_context(dir: &Path) -> Option<String> {
    let ecosystems = detect_ecosystems(dir);
    if ecosystems.is_empty() {
        return None;
    }
    Some(format!("[Project Context: {}]", ecosystems.join(", ")))
}
