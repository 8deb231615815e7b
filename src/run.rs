use tracing::{debug, warn};

use crate::check::Checker;
use crate::config::Catalog;
use crate::progress::{clear_spinner, request_spinner};
use crate::report;
use crate::types::{CheckResult, Role, RunSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    RunningChecks,
    Summarizing,
    Done,
}

#[derive(Debug)]
pub struct RunReport {
    pub summary: RunSummary,
    /// Checks actually sent, in order.
    pub executed: Vec<CheckResult>,
    /// Set when a precondition failed and later sections were skipped.
    pub aborted: bool,
}

impl RunReport {
    pub fn exit_code(&self) -> i32 {
        self.summary.exit_code()
    }
}

/// Walks a catalog once, section by section, printing as it goes.
pub struct RunDriver<'a> {
    checker: &'a Checker,
    targets: report::Targets,
    phase: Phase,
}

impl<'a> RunDriver<'a> {
    pub fn new(checker: &'a Checker, targets: report::Targets) -> Self {
        Self {
            checker,
            targets,
            phase: Phase::NotStarted,
        }
    }

    fn advance(&mut self, next: Phase) {
        debug!("run phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    pub async fn run(&mut self, catalog: &Catalog) -> RunReport {
        self.advance(Phase::RunningChecks);
        let timestamp = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
        println!("{}", report::banner(&self.targets, &timestamp));

        let mut summary = RunSummary::default();
        let mut executed = Vec::new();
        let mut fatal: Option<CheckResult> = None;

        for (idx, section) in catalog.sections.iter().enumerate() {
            println!("{}", report::section_header(idx + 1, &section.title));

            for spec in &section.checks {
                let pb = request_spinner(&spec.description);
                let result = self.checker.run(spec).await;
                clear_spinner(&pb);

                for line in report::check_lines(&result) {
                    println!("{line}");
                }
                summary.record(&result);

                if result.is_fatal() {
                    warn!("precondition '{}' failed: {}", spec.description, result.detail);
                    fatal.get_or_insert_with(|| result.clone());
                } else if result.spec.role == Role::Advisory && result.failure.is_some() {
                    warn!("advisory check '{}' failed: {}", spec.description, result.detail);
                }
                executed.push(result);
            }

            if let Some(failed) = &fatal {
                println!("{}", report::aborted(failed));
                break;
            }
        }

        self.advance(Phase::Summarizing);
        println!("{}", report::summary(&summary, &self.targets));
        self.advance(Phase::Done);

        RunReport {
            summary,
            executed,
            aborted: fatal.is_some(),
        }
    }
}
