// src/notify/email.rs
use anyhow::{Context, Result};
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use super::{render_report, Notifier};
use crate::config::EmailConfig;
use crate::models::{Match, RunStats};

/// Plain-text SMTP report. Runs without matches send nothing.
pub struct EmailNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailNotifier {
    pub fn from_config(cfg: &EmailConfig) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(cfg.smtp_host.trim())
            .with_context(|| format!("invalid smtp_host {:?}", cfg.smtp_host))?
            .port(cfg.smtp_port);
        if !cfg.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                cfg.username.clone(),
                cfg.password.clone(),
            ));
        }

        let from = cfg.from.parse().context("invalid email.from")?;
        let to = cfg.to.parse().context("invalid email.to")?;

        Ok(Self {
            mailer: builder.build(),
            from,
            to,
        })
    }
}

pub(crate) fn subject(matches: &[Match]) -> String {
    match matches.len() {
        1 => format!("job-radar: 1 new match ({})", matches[0].posting.title),
        n => format!("job-radar: {n} new matches"),
    }
}

#[async_trait::async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &str {
        "email"
    }

    async fn notify(&self, matches: &[Match], stats: &RunStats) -> Result<()> {
        if matches.is_empty() {
            tracing::debug!(target: "notify", "email skipped, no matches");
            return Ok(());
        }

        let msg = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject(matches))
            .header(header::ContentType::TEXT_PLAIN)
            .body(render_report(matches, stats))
            .context("build email")?;

        self.mailer.send(msg).await.context("send email")?;
        tracing::info!(target: "notify", to = %self.to, matches = matches.len(), "email sent");
        Ok(())
    }
}
