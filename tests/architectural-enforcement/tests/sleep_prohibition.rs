//! Integration Test: Sleep Prohibition
//!
//! **Policy**: The engine and the CLI MUST NOT call sleep methods. Every
//! pause in this codebase is a wait on I/O: a channel recv, a socket read,
//! or an interval tick.
//!
//! **Exceptions**: Exponential backoff (reconnect logic only), test code,
//! periodic tasks driven by `tokio::time::interval()`.

use std::fs;
use std::path::{Path, PathBuf};

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_sleep_violations();

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Sleep calls found in production code!");
        eprintln!("Waiting happens on I/O, never on the clock.\n");

        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }

        eprintln!("\n✅ ACCEPTABLE sleep uses:");
        eprintln!("  - Exponential backoff in reconnect logic");
        eprintln!("  - Test code (#[test] or #[tokio::test] functions)");
        eprintln!("  - Periodic tasks using tokio::time::interval()");
        eprintln!("\n❌ FORBIDDEN:");
        eprintln!("  - Sleep in polling loops");
        eprintln!("  - Sleep as poor man's synchronization");
        eprintln!("  - Sleep to 'wait' for frames (use async I/O!)");

        panic!(
            "\nFound {} sleep violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

/// Find all sleep() calls in production code
fn find_sleep_violations() -> Vec<String> {
    let mut violations = Vec::new();

    // Check the engine crate
    check_directory(
        &workspace_path("hive/core/src"),
        &mut violations,
        &SleepPolicy {
            allow_backoff: true,
            allow_tests: true,
        },
    );

    // Check the CLI harness
    check_directory(
        &workspace_path("hive/cli/src"),
        &mut violations,
        &SleepPolicy {
            allow_backoff: true,
            allow_tests: true,
        },
    );

    violations
}

/// Resolve a path relative to the workspace root
///
/// Test binaries run from this package's directory, so relative paths
/// would scan nothing. Anchor on the manifest dir instead.
fn workspace_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .join(relative)
}

struct SleepPolicy {
    allow_backoff: bool,
    allow_tests: bool,
}

fn check_directory(dir: &Path, violations: &mut Vec<String>, policy: &SleepPolicy) {
    assert!(
        dir.exists(),
        "Scan root {} is missing; the enforcement test would silently pass",
        dir.display()
    );

    for entry in walkdir::WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        if entry.path().extension().and_then(|s| s.to_str()) == Some("rs") {
            check_file(entry.path(), violations, policy);
        }
    }
}

fn check_file(path: &Path, violations: &mut Vec<String>, policy: &SleepPolicy) {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return,
    };

    let lines: Vec<&str> = content.lines().collect();

    for (idx, line) in lines.iter().enumerate() {
        let line_number = idx + 1;

        // Skip comments
        let code_part = line.split("//").next().unwrap_or(line);

        // Check for sleep calls
        if code_part.contains("::sleep(") || code_part.contains(".sleep(") {
            // Check if it's in a test function
            if policy.allow_tests && is_in_test_function(&lines, idx) {
                continue;
            }

            // Check if it's exponential backoff
            if policy.allow_backoff && is_backoff_context(&lines, idx) {
                continue;
            }

            // Check if it's using tokio::time::interval (acceptable)
            if is_interval_pattern(&lines, idx) {
                continue;
            }

            violations.push(format!(
                "{}:{} - {}",
                path.display(),
                line_number,
                line.trim()
            ));
        }
    }
}

/// Check if line is inside a test function
fn is_in_test_function(lines: &[&str], current_idx: usize) -> bool {
    // Scan backwards for #[test] or #[tokio::test]
    for i in (0..current_idx).rev() {
        let line = lines[i].trim();

        if line.starts_with("fn ") && !line.contains("test") {
            return false; // Found a non-test function first
        }

        if line.starts_with("#[test]") || line.starts_with("#[tokio::test") {
            return true;
        }

        // Stop at module boundaries
        if line.starts_with("mod ") || line.starts_with("impl ") {
            return false;
        }
    }
    false
}

/// Check if sleep is used for exponential backoff (acceptable for reconnect logic)
fn is_backoff_context(lines: &[&str], current_idx: usize) -> bool {
    // Look for backoff, retry, reconnect in nearby lines
    let context_range = current_idx.saturating_sub(15)..std::cmp::min(current_idx + 5, lines.len());

    let mut has_backoff_calc = false;
    let mut has_retry_context = false;

    for i in context_range {
        let line = lines[i].to_lowercase();

        // Check for exponential backoff calculation (2^n pattern or bit shift)
        if line.contains("<<") || line.contains("pow") || line.contains("* 2") {
            has_backoff_calc = true;
        }

        // Check for retry/reconnect context
        if line.contains("retry")
            || line.contains("reconnect")
            || line.contains("backoff")
            || line.contains("attempt")
        {
            has_retry_context = true;
        }
    }

    has_backoff_calc && has_retry_context
}

/// Check if this is tokio::time::interval pattern (acceptable for periodic tasks)
fn is_interval_pattern(lines: &[&str], current_idx: usize) -> bool {
    // Acceptable: let mut interval = tokio::time::interval(...); loop { interval.tick().await; }

    // Look backwards for interval usage
    let context_range = current_idx.saturating_sub(20)..current_idx;

    for i in context_range {
        let line = lines[i];
        if line.contains("interval.tick()") || line.contains("tokio::time::interval") {
            return true;
        }
    }

    // Also check forward a bit
    let forward_range = current_idx..std::cmp::min(current_idx + 5, lines.len());
    for i in forward_range {
        let line = lines[i];
        if line.contains("interval.tick()") {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleep_violation_detection() {
        // This test verifies that the detector itself works
        let test_code = vec![
            "fn drain_frames() {",
            "    tokio::time::sleep(Duration::from_millis(10)).await;",
            "}",
        ];

        assert!(
            !is_in_test_function(&test_code, 1),
            "Should detect this is not a test"
        );
    }

    #[test]
    fn test_test_function_detection() {
        let test_code = vec![
            "#[tokio::test]",
            "async fn test_settle() {",
            "    tokio::time::sleep(Duration::from_millis(10)).await;",
            "}",
        ];

        assert!(
            is_in_test_function(&test_code, 2),
            "Should recognize sleep inside a test function"
        );
    }

    #[test]
    fn test_backoff_detection() {
        let test_code = vec![
            "async fn reconnect(&mut self) {",
            "    let delay = BASE_DELAY_MS * (1 << attempt);",
            "    tracing::info!(attempt, \"Reconnecting\");",
            "    tokio::time::sleep(Duration::from_millis(delay)).await;",
            "}",
        ];

        assert!(
            is_backoff_context(&test_code, 3),
            "Should detect exponential backoff pattern"
        );
    }

    #[test]
    fn test_interval_detection() {
        let test_code = vec![
            "let mut poll = tokio::time::interval(Duration::from_millis(50));",
            "loop {",
            "    poll.tick().await;",
            "}",
        ];

        assert!(
            is_interval_pattern(&test_code, 2),
            "Should accept interval-driven ticks"
        );
    }
}
