// src/notify/console.rs
use anyhow::Result;

use super::{render_report, Notifier};
use crate::models::{Match, RunStats};

/// Prints the report to stdout.
pub struct ConsoleNotifier;

#[async_trait::async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    async fn notify(&self, matches: &[Match], stats: &RunStats) -> Result<()> {
        println!("{}", render_report(matches, stats));
        Ok(())
    }
}
