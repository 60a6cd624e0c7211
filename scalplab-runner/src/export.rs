//! Report export: JSON report and a flat trades CSV.

use std::path::Path;
use thiserror::Error;

use crate::runner::BacktestReport;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write trades csv: {0}")]
    Csv(#[from] csv::Error),
}

/// Write the full report as pretty JSON.
pub fn write_report_json(report: &BacktestReport, path: &Path) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Write one row per trade, flat columns for spreadsheet use.
pub fn write_trades_csv(report: &BacktestReport, path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "entry_time",
        "exit_time",
        "direction",
        "rule",
        "entry_price",
        "exit_price",
        "units",
        "profit_loss",
        "exit",
        "reason",
    ])?;
    for trade in &report.result.trades {
        writer.write_record([
            trade.entry_time.to_rfc3339(),
            trade.exit_time.to_rfc3339(),
            format!("{:?}", trade.direction),
            trade.rule.to_string(),
            format!("{}", trade.entry_price),
            format!("{}", trade.exit_price),
            format!("{}", trade.units),
            format!("{}", trade.profit_loss),
            format!("{:?}", trade.exit),
            trade.reason.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
