//! Integration Test: Logging Discipline
//!
//! **Policy**: The engine MUST NOT write to stdout or stderr. It is a
//! library embedded in frontends that own the terminal; diagnostics go
//! through `tracing` and the subscriber decides where they land.
//!
//! **Exceptions**: Test code. The CLI renders the conversation, so
//! user-facing printing is its job there; `dbg!` is a leftover debugging
//! artifact and stays forbidden everywhere.

use std::fs;
use std::path::{Path, PathBuf};

/// Print-style macros, longest name first so `eprintln!` is not
/// misreported as `println!`
const PRINT_MACROS: &[&str] = &["eprintln!(", "println!(", "eprint!(", "print!(", "dbg!("];

/// Test that the engine never prints and nobody ships a dbg!
#[test]
fn test_no_direct_output_in_engine() {
    let violations = find_output_violations();

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Direct terminal output found!");
        eprintln!("The engine logs through tracing; frontends own the terminal.\n");

        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }

        eprintln!("\n✅ ACCEPTABLE output:");
        eprintln!("  - tracing::debug!/info!/warn!/error! anywhere");
        eprintln!("  - println! in the CLI (it renders the conversation)");
        eprintln!("  - Test code");
        eprintln!("\n❌ FORBIDDEN:");
        eprintln!("  - println!/eprintln! in the engine crate");
        eprintln!("  - dbg! anywhere in production code");

        panic!(
            "\nFound {} output violation(s).\nFix these before merging!",
            violations.len()
        );
    }
}

/// Find all direct-output macro calls that break the policy
fn find_output_violations() -> Vec<String> {
    let mut violations = Vec::new();

    // The engine crate: no printing at all
    check_directory(
        &workspace_path("hive/core/src"),
        &mut violations,
        &OutputPolicy {
            allow_user_facing_print: false,
        },
    );

    // The CLI: printing is the point, but dbg! still may not ship
    check_directory(
        &workspace_path("hive/cli/src"),
        &mut violations,
        &OutputPolicy {
            allow_user_facing_print: true,
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

struct OutputPolicy {
    allow_user_facing_print: bool,
}

fn check_directory(dir: &Path, violations: &mut Vec<String>, policy: &OutputPolicy) {
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

fn check_file(path: &Path, violations: &mut Vec<String>, policy: &OutputPolicy) {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return,
    };

    let lines: Vec<&str> = content.lines().collect();

    for (idx, line) in lines.iter().enumerate() {
        let line_number = idx + 1;

        // Skip comments
        let code_part = line.split("//").next().unwrap_or(line);

        let Some(macro_name) = first_print_macro(code_part) else {
            continue;
        };

        // dbg! is forbidden regardless of the directory policy
        if macro_name != "dbg!(" && policy.allow_user_facing_print {
            continue;
        }

        // Test code gets a pass
        if is_in_test_code(&lines, idx) {
            continue;
        }

        violations.push(format!(
            "{}:{} [{}] - {}",
            path.display(),
            line_number,
            macro_name.trim_end_matches('('),
            line.trim()
        ));
    }
}

/// The first print-style macro on the line, if any
fn first_print_macro(code_part: &str) -> Option<&'static str> {
    PRINT_MACROS
        .iter()
        .find(|name| code_part.contains(*name))
        .copied()
}

/// Check if line is inside test code
///
/// Test modules sit at the bottom of each source file, so anything after
/// a `#[cfg(test)]` marker is test code. Standalone `#[test]` functions
/// are recognized the same way the sleep scan does it.
fn is_in_test_code(lines: &[&str], current_idx: usize) -> bool {
    for i in (0..current_idx).rev() {
        let line = lines[i].trim();

        if line.starts_with("#[cfg(test)]") {
            return true;
        }

        if line.starts_with("#[test]") || line.starts_with("#[tokio::test") {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_macro_detection() {
        assert_eq!(
            first_print_macro(r#"    println!("hello");"#),
            Some("println!(")
        );
        assert_eq!(
            first_print_macro(r#"    eprintln!("oops");"#),
            Some("eprintln!("),
            "eprintln! must not be reported as println!"
        );
        assert_eq!(first_print_macro("let x = dbg!(y);"), Some("dbg!("));
        assert_eq!(first_print_macro("tracing::info!(\"fine\");"), None);
    }

    #[test]
    fn test_comments_are_skipped() {
        let line = r#"// println!("commented out");"#;
        let code_part = line.split("//").next().unwrap_or(line);
        assert_eq!(first_print_macro(code_part), None);
    }

    #[test]
    fn test_cfg_test_marker_recognized() {
        let test_code = vec![
            "#[cfg(test)]",
            "mod tests {",
            "    #[test]",
            "    fn test_output() {",
            r#"        println!("debugging a test is fine");"#,
            "    }",
            "}",
        ];

        assert!(
            is_in_test_code(&test_code, 4),
            "Code after #[cfg(test)] is test code"
        );
    }

    #[test]
    fn test_production_code_not_excused() {
        let test_code = vec![
            "pub fn apply_event(&mut self) {",
            r#"    println!("applying");"#,
            "}",
        ];

        assert!(
            !is_in_test_code(&test_code, 1),
            "Production function must not be treated as test code"
        );
    }
}
