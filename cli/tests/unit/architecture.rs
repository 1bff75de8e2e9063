//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layer boundaries hold:
//! domain is pure, services only see domain and ports, and infra never
//! reaches up into presentation code.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Track brace depth and return whether a line is inside a `#[cfg(test)]` block.
struct CfgTestTracker {
    in_test_block: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    /// Process a line and return `true` if it's inside a `#[cfg(test)]` block.
    fn process_line(&mut self, line: &str) -> bool {
        if line.trim().contains("#[cfg(test)]") {
            self.in_test_block = true;
            self.test_block_start_depth = self.brace_depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                _ => {}
            }
        }
        self.in_test_block
    }
}

/// Non-test, non-comment lines of every file under `src/<layer>`, with
/// their file-relative line numbers.
fn production_lines(layer: &str) -> Vec<(String, usize, String)> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(layer);
    let mut out = Vec::new();
    for file in collect_rs_files(&dir) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        let mut tracker = CfgTestTracker::new();
        for (i, line) in content.lines().enumerate() {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            if in_test || trimmed.starts_with("//") {
                continue;
            }
            out.push((rel.clone(), i + 1, line.to_string()));
        }
    }
    out
}

fn assert_no_matches(layer: &str, forbidden: &[&str], why: &str) {
    let violations: Vec<String> = production_lines(layer)
        .into_iter()
        .filter(|(_, _, line)| forbidden.iter().any(|f| line.contains(f)))
        .map(|(rel, n, line)| format!("{rel}:{n}: {}", line.trim()))
        .collect();
    assert!(violations.is_empty(), "{why}:\n{}", violations.join("\n"));
}

#[test]
fn domain_is_pure() {
    assert_no_matches(
        "domain",
        &[
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
            "tokio::",
            "std::fs",
            "std::process",
            "std::net",
        ],
        "domain/ must not perform I/O or import outer layers",
    );
}

#[test]
fn application_imports_only_domain_and_ports() {
    assert_no_matches(
        "application",
        &["crate::infra", "crate::commands", "crate::output", "std::fs::", "std::env::var"],
        "application/ must only depend on domain/ and its own ports",
    );
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    assert_no_matches(
        "infra",
        &["crate::commands", "crate::output"],
        "infra/ must not import from commands/ or output/",
    );
}

#[test]
fn infra_has_no_print_macros_outside_tests() {
    assert_no_matches(
        "infra",
        &["println!", "eprintln!"],
        "infra/ must not use println!/eprintln! outside #[cfg(test)]",
    );
}

#[test]
fn services_never_print() {
    assert_no_matches(
        "application",
        &["println!", "eprintln!"],
        "services report through ProgressReporter, not stdout",
    );
}

/// Command files that use `AppContext` fields must receive `&AppContext`
/// rather than individual loose parameters.
#[test]
fn command_handlers_accept_app_context() {
    let commands_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join("commands");
    let mut violations = Vec::new();
    for file in collect_rs_files(&commands_dir) {
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        if !content.contains("pub async fn run(") {
            continue;
        }
        let uses_app_fields = content.contains("app.output")
            || content.contains("app.fs")
            || content.contains("app.env")
            || content.contains("app.reporter()");
        if uses_app_fields && !content.contains("app: &AppContext") {
            violations.push(file.display().to_string());
        }
    }
    assert!(
        violations.is_empty(),
        "command handlers using AppContext fields must take `app: &AppContext`:\n{}",
        violations.join("\n")
    );
}
