//! Verdicts, counters and the final summary

use colored::Colorize;

/// Outcome of one scenario
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Passed,
    /// A request or a response check failed
    Failed(String),
    /// A prerequisite token or fixture was missing; nothing was sent
    Skipped(String),
}

impl Verdict {
    pub fn is_passed(&self) -> bool {
        matches!(self, Verdict::Passed)
    }

    /// `Passed` when true, otherwise `Failed(reason)`
    pub fn from_success(success: bool, reason: &str) -> Self {
        if success {
            Verdict::Passed
        } else {
            Verdict::Failed(reason.to_string())
        }
    }
}

/// Request counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub run: usize,
    pub passed: usize,
}

impl Tally {
    pub fn record(&mut self, passed: bool) {
        self.run += 1;
        if passed {
            self.passed += 1;
        }
    }

    /// Percentage of passed requests; 0.0 when nothing ran
    pub fn success_rate(&self) -> f64 {
        if self.run == 0 {
            0.0
        } else {
            self.passed as f64 / self.run as f64 * 100.0
        }
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    pub results: Vec<(&'static str, Verdict)>,
    pub tally: Tally,
    pub cleanup: Tally,
}

impl SuiteReport {
    pub fn all_passed(&self) -> bool {
        self.tally.passed == self.tally.run && self.results.iter().all(|(_, v)| v.is_passed())
    }

    /// Process exit code: 0 if everything passed, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }

    pub fn verdict(&self, name: &str) -> Option<&Verdict> {
        self.results.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(50));
        println!("📊 {}", "FINAL RESULTS:".bold());
        println!("   Tests run: {}", self.tally.run);
        println!("   Tests passed: {}", self.tally.passed);
        println!("   Success rate: {:.1}%", self.tally.success_rate());

        if self.cleanup.run > 0 {
            println!(
                "   Cleanup requests: {} ({} ok, not scored)",
                self.cleanup.run, self.cleanup.passed
            );
        }

        let not_passed: Vec<_> = self
            .results
            .iter()
            .filter(|(_, v)| !v.is_passed())
            .collect();
        if !not_passed.is_empty() {
            println!("\n   {}", "Scenarios not passed:".yellow());
            for (name, verdict) in not_passed {
                match verdict {
                    Verdict::Failed(reason) => {
                        println!("   {} {}: {}", "✗".red(), name, reason.dimmed())
                    }
                    Verdict::Skipped(reason) => {
                        println!("   {} {}: {}", "-".yellow(), name, reason.dimmed())
                    }
                    Verdict::Passed => {}
                }
            }
        }

        if self.all_passed() {
            println!("{}", "🎉 All tests passed!".green().bold());
        } else {
            println!("{}", "⚠️  Some tests failed!".red().bold());
        }
    }
}
