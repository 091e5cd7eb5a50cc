mod fetch;
mod resolve;

use pricechart_core::{ChartRequest, PeriodCode, TickerInput};
use serde_json::Value;
use uuid::Uuid;

use crate::cli::{Cli, Command, WindowArgs};
use crate::error::CliError;

/// Everything a command produced, independent of output format.
pub struct CommandResult {
    pub request_id: Option<Uuid>,
    pub data: Value,
    pub chart: Option<Value>,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            request_id: None,
            data,
            chart: None,
            columns: Vec::new(),
            rows: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_chart(mut self, chart: Option<Value>) -> Self {
        self.chart = chart;
        self
    }

    pub fn with_table(mut self, columns: Vec<&'static str>, rows: Vec<Vec<String>>) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    match &cli.command {
        Command::Fetch(args) => fetch::run(args).await,
        Command::Resolve(args) => resolve::run(args),
    }
}

/// Build the inbound request from CLI flags; tickers may mix spaces and commas.
fn chart_request(tickers: &[String], window: &WindowArgs) -> Result<ChartRequest, CliError> {
    Ok(ChartRequest {
        tickers: TickerInput::Joined(tickers.join(",")),
        period: PeriodCode::parse(&window.period)?,
        start_date: window.start_date.clone(),
        end_date: window.end_date.clone(),
    })
}
