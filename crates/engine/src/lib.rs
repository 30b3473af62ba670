use api_client::{AccountSession, ApiClient};
use chrono::Local;
use configuration::{AccountConfig, OutputFormat, ReportConfig};
use futures::future::join_all;
use report::AccountReport;
use std::io::Write;
use std::sync::Arc;

pub mod error;

pub use error::EngineError;

/// Knobs the runner reads from the `[report]` section and the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub include_spot: bool,
    pub concurrent: bool,
    pub format: OutputFormat,
}

impl From<&ReportConfig> for RunOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            include_spot: config.include_spot,
            concurrent: config.concurrent,
            format: config.format,
        }
    }
}

/// What a finished run looked like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub accounts: usize,
    /// Accounts where every requested table came back empty.
    pub empty_accounts: usize,
}

/// Produces one report per configured account, in declaration order.
///
/// Sessions are built up front so a bad account entry fails the run before
/// any request goes out. After that nothing can stop the loop: each session
/// contains its own failures and the runner always reaches the completion
/// marker.
pub struct Runner {
    sessions: Vec<AccountSession>,
    options: RunOptions,
}

impl Runner {
    pub fn new(
        accounts: &[AccountConfig],
        client: Arc<dyn ApiClient>,
        options: RunOptions,
    ) -> Result<Self, EngineError> {
        if accounts.is_empty() {
            return Err(EngineError::NoAccounts);
        }

        let sessions = accounts
            .iter()
            .map(|account| -> Result<AccountSession, EngineError> {
                Ok(AccountSession::new(
                    account.credential()?,
                    account.endpoints(),
                    client.clone(),
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { sessions, options })
    }

    /// Fetches every account. The result keeps declaration order even when
    /// accounts are fetched concurrently.
    pub async fn collect(&self) -> Vec<AccountReport> {
        if self.options.concurrent {
            join_all(self.sessions.iter().map(|s| self.fetch_account(s))).await
        } else {
            let mut reports = Vec::with_capacity(self.sessions.len());
            for session in &self.sessions {
                reports.push(self.fetch_account(session).await);
            }
            reports
        }
    }

    /// Runs the whole batch and writes the report to `out`.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<RunSummary, EngineError> {
        let reports = match self.options.format {
            OutputFormat::Text => self.run_text(out).await?,
            OutputFormat::Json => {
                let reports = self.collect().await;
                writeln!(out, "{}", report::render_json(Local::now(), &reports)?)?;
                reports
            }
        };

        let summary = RunSummary {
            accounts: reports.len(),
            empty_accounts: reports.iter().filter(|r| is_empty(r)).count(),
        };
        tracing::info!(
            accounts = summary.accounts,
            empty = summary.empty_accounts,
            "Portfolio query finished."
        );
        Ok(summary)
    }

    async fn run_text<W: Write>(&self, out: &mut W) -> Result<Vec<AccountReport>, EngineError> {
        write!(out, "{}", report::render_header(Local::now()))?;

        let reports = if self.options.concurrent {
            let reports = self.collect().await;
            for r in &reports {
                write!(out, "{}", report::render_account(r))?;
            }
            reports
        } else {
            // Sequential mode prints each account as soon as it is fetched.
            let mut reports = Vec::with_capacity(self.sessions.len());
            for session in &self.sessions {
                let r = self.fetch_account(session).await;
                write!(out, "{}", report::render_account(&r))?;
                out.flush()?;
                reports.push(r);
            }
            reports
        };

        write!(out, "{}", report::render_footer())?;
        out.flush()?;
        Ok(reports)
    }

    async fn fetch_account(&self, session: &AccountSession) -> AccountReport {
        tracing::debug!(account = %session.name(), "Fetching account.");

        let spot = async {
            if self.options.include_spot {
                Some(session.spot_balances().await)
            } else {
                None
            }
        };
        let (spot_balances, futures_balances, positions) =
            tokio::join!(spot, session.futures_balances(), session.futures_positions());

        AccountReport {
            account: session.name().to_string(),
            spot_balances,
            futures_balances,
            positions,
        }
    }
}

fn is_empty(report: &AccountReport) -> bool {
    report.spot_balances.as_ref().is_none_or(|s| s.is_empty())
        && report.futures_balances.is_empty()
        && report.positions.is_empty()
}
