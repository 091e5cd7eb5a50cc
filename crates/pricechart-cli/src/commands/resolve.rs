use pricechart_core::format_iso_date;
use serde::Serialize;
use time::OffsetDateTime;

use crate::cli::ResolveArgs;
use crate::error::CliError;

use super::{chart_request, CommandResult};

#[derive(Debug, Serialize)]
struct ResolveResponseData {
    period: &'static str,
    start_date: String,
    end_date: String,
    days: i64,
}

pub fn run(args: &ResolveArgs) -> Result<CommandResult, CliError> {
    let today = OffsetDateTime::now_utc().date();
    let request = chart_request(&[], &args.window)?;
    let selection = request.selection()?;
    let range = selection.resolve(today)?;

    let data = ResolveResponseData {
        period: selection.period().as_str(),
        start_date: format_iso_date(range.start()),
        end_date: format_iso_date(range.end()),
        days: range.days(),
    };
    let row = vec![
        data.period.to_owned(),
        data.start_date.clone(),
        data.end_date.clone(),
        data.days.to_string(),
    ];

    Ok(CommandResult::ok(serde_json::to_value(data)?)
        .with_table(vec!["period", "start_date", "end_date", "days"], vec![row]))
}
