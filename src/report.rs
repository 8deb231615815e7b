use console::Style;

use crate::types::{CheckFailure, CheckResult, Outcome, Probe, Role, RunSummary};

const RULE_WIDTH: usize = 50;

fn blue() -> Style {
    Style::new().blue()
}

fn green() -> Style {
    Style::new().green()
}

fn red() -> Style {
    Style::new().red()
}

fn yellow() -> Style {
    Style::new().yellow()
}

/// Where the run is pointed, for the banner and the closing hints.
#[derive(Debug, Clone)]
pub struct Targets {
    pub api_url: String,
    pub dashboard_url: String,
}

pub fn header(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "\n{}\n{}\n{}\n",
        blue().apply_to(&rule),
        blue().apply_to(title),
        blue().apply_to(&rule)
    )
}

pub fn section_header(number: usize, title: &str) -> String {
    header(&format!("Test {number}: {title}"))
}

pub fn banner(targets: &Targets, timestamp: &str) -> String {
    format!(
        "{}Timestamp: {timestamp}\nAPI:       {}\nDashboard: {}\n",
        header("TrinityChain Dashboard API Tests"),
        targets.api_url,
        targets.dashboard_url
    )
}

fn pass_line(msg: &str) -> String {
    format!("  {}", green().apply_to(format!("✓ {msg}")))
}

fn fail_line(msg: &str) -> String {
    format!("  {}", red().apply_to(format!("✗ {msg}")))
}

fn warn_line(msg: &str) -> String {
    format!("  {}", yellow().apply_to(format!("⚠ {msg}")))
}

/// Lines describing one finished check.
pub fn check_lines(result: &CheckResult) -> Vec<String> {
    let spec = &result.spec;
    let mut lines = vec![format!("{}", blue().apply_to(format!("→ {}", spec.description)))];

    lines.push(format!("    URL: {} {}", spec.method, result.url));
    if let Some(status) = result.http_status {
        lines.push(format!("    Status: {status}"));
    }

    match (result.outcome, spec.probe) {
        (Outcome::Pass, Probe::Reachable) => lines.push(pass_line(&format!("Responding ({})", result.detail))),
        (Outcome::Pass, Probe::Json) => {
            lines.push(pass_line("Valid JSON response"));
            lines.push(format!("    Data: {}...", result.detail));
        }
        (Outcome::Pass, Probe::Cors) => lines.push(pass_line(&format!("CORS enabled: {}", result.detail))),
        (Outcome::Pass, Probe::Schema) => {
            lines.push(pass_line("All required fields present"));
            lines.push(format!("    Data: {}", result.detail));
        }
        (Outcome::Warn, Probe::Cors) => {
            lines.push(warn_line("CORS headers may not be configured properly"));
            lines.push(format!("    {}", result.detail));
        }
        (Outcome::Warn, _) => lines.push(warn_line(&format!("Response: {}", result.detail))),
        (Outcome::Fail, _) => {
            let msg = match &result.failure {
                Some(CheckFailure::MissingFields(fields)) => format!("Missing fields: [{}]", fields.join(", ")),
                Some(failure) if spec.role != Role::Standard => format!("Not responding: {failure}"),
                Some(failure) => capitalize(&failure.to_string()),
                None => capitalize(&result.detail),
            };
            if spec.role == Role::Advisory {
                lines.push(warn_line(&msg));
            } else {
                lines.push(fail_line(&msg));
            }
            if let Some(CheckFailure::MissingFields(_)) = result.failure {
                lines.push(format!("    Got: {}", result.detail));
            }
            if let Some(hint) = &spec.fix_hint {
                lines.push(format!("    {hint}"));
            }
        }
    }

    lines
}

pub fn aborted(result: &CheckResult) -> String {
    format!(
        "\n{}",
        red().apply_to(format!(
            "✗ {} is required for the remaining checks; stopping here.",
            result.spec.description
        ))
    )
}

pub fn summary(summary: &RunSummary, targets: &Targets) -> String {
    let mut out = header("Test Summary");
    out.push_str(&format!("{}\n", green().apply_to(format!("Passed: {}", summary.passed))));
    out.push_str(&format!("{}\n", red().apply_to(format!("Failed: {}", summary.failed))));
    if summary.warnings > 0 {
        out.push_str(&format!("{}\n", yellow().apply_to(format!("Warnings: {}", summary.warnings))));
    }
    out.push('\n');

    if summary.success() {
        out.push_str(&format!("{}\n", green().apply_to("✓ All tests passed!")));
        out.push_str("\nNext steps:\n");
        out.push_str(&format!("1. Refresh dashboard: {}\n", targets.dashboard_url));
        out.push_str("2. Open browser DevTools (F12)\n");
        out.push_str("3. Go to Console tab to check for errors\n");
        out.push_str("4. Go to Network tab to see API calls\n");
        out.push_str("5. Try creating a wallet in the Wallet tab\n");
    } else {
        out.push_str(&format!("{}\n", red().apply_to("✗ Some tests failed")));
        out.push_str("\nTroubleshooting:\n");
        out.push_str("• Make sure both servers are running:\n");
        out.push_str("  1. cargo run --release --bin trinity-api\n");
        out.push_str("  2. cd dashboard && npm run dev\n");
        out.push_str(&format!(
            "• Check that nothing else is bound to {} or {}\n",
            targets.api_url, targets.dashboard_url
        ));
        out.push_str("• Check the server logs for errors\n");
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
