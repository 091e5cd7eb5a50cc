use std::io::Write;

use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::commands::CommandResult;
use crate::error::CliError;

pub fn render(result: &CommandResult, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    write_result(&mut stdout, result, format, pretty)?;
    stdout.flush()?;

    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }

    Ok(())
}

fn write_result(
    out: &mut impl Write,
    result: &CommandResult,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => write_json(out, &envelope(result, &result.data), pretty),
        OutputFormat::Chart => match &result.chart {
            Some(chart) => write_json(out, chart, pretty),
            // Commands without a chart fall back to their JSON data.
            None => write_json(out, &envelope(result, &result.data), pretty),
        },
        OutputFormat::Table => write_table(out, result).map_err(CliError::from),
    }
}

fn envelope(result: &CommandResult, data: &Value) -> Value {
    let mut meta = json!({});
    if let Some(request_id) = result.request_id {
        meta["request_id"] = json!(request_id.to_string());
    }
    if !result.warnings.is_empty() {
        meta["warnings"] = json!(result.warnings);
    }
    json!({ "meta": meta, "data": data })
}

fn write_json(out: &mut impl Write, value: &Value, pretty: bool) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writeln!(out, "{payload}")?;
    Ok(())
}

fn write_table(out: &mut impl Write, result: &CommandResult) -> std::io::Result<()> {
    if let Some(request_id) = result.request_id {
        writeln!(out, "request_id: {request_id}")?;
    }
    if result.rows.is_empty() {
        return writeln!(out, "(no rows)");
    }

    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            result
                .rows
                .iter()
                .filter_map(|row| row.get(index).map(String::len))
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = result.columns.iter().map(|c| c.to_string()).collect();
    writeln!(out, "{}", format_row(&header, &widths))?;
    writeln!(
        out,
        "{}",
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  ")
    )?;
    for row in &result.rows {
        writeln!(out, "{}", format_row(row, &widths))?;
    }
    Ok(())
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_owned()
}
