use crate::core::calculator::TimeWindow;
use crate::db::pool::DbPool;
use crate::db::{activities, sessions};
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{ActivityExport, SessionExport};
use crate::export::{ExportFormat, ExportKind};
use crate::ui::messages::warning;
use crate::utils::date::resolve_period;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// What to export and where.
#[derive(Debug, Clone)]
pub struct ExportRequest<'a> {
    pub format: ExportFormat,
    pub kind: ExportKind,
    pub file: &'a str,
    /// `None` or `"all"`, else anything `resolve_period` accepts.
    pub range: Option<&'a str>,
    pub worker_id: Option<&'a str>,
    pub force: bool,
}

pub struct ExportLogic;

impl ExportLogic {
    /// Write the selected sessions or activities. Returns the number of rows.
    pub fn export(pool: &DbPool, req: &ExportRequest<'_>) -> AppResult<usize> {
        let path = Path::new(req.file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {}",
                req.file
            )));
        }

        ensure_writable(path, req.force)?;

        let (from, to) = match req.range {
            None => full_range()?,
            Some(r) if r.eq_ignore_ascii_case("all") => full_range()?,
            Some(r) => resolve_period(r)?,
        };

        let rows = match req.kind {
            ExportKind::Sessions => {
                let rows: Vec<SessionExport> = pool
                    .with_conn(|conn| sessions::in_range(conn, req.worker_id, &from, &to))?
                    .iter()
                    .map(SessionExport::from)
                    .collect();
                write(req.format, &rows, path)?
            }
            ExportKind::Activities => {
                let from_ms = TimeWindow::for_date(from)?.start_ms();
                let to_ms = TimeWindow::for_date(to)?.end_ms() - 1;
                let rows: Vec<ActivityExport> = pool
                    .with_conn(|conn| activities::in_range(conn, req.worker_id, from_ms, to_ms))?
                    .iter()
                    .map(ActivityExport::from)
                    .collect();
                write(req.format, &rows, path)?
            }
        };

        info!(
            format = req.format.as_str(),
            kind = ?req.kind,
            rows,
            file = %path.display(),
            "export finished"
        );
        Ok(rows)
    }
}

fn full_range() -> AppResult<(NaiveDate, NaiveDate)> {
    let from = NaiveDate::from_ymd_opt(1970, 1, 1);
    let to = NaiveDate::from_ymd_opt(9999, 12, 30);
    from.zip(to)
        .ok_or_else(|| AppError::InvalidDate("export range".into()))
}

fn write<T: Serialize>(format: ExportFormat, rows: &[T], path: &Path) -> AppResult<usize> {
    if rows.is_empty() {
        warning("No records found for the selected range. Nothing to export.");
        return Ok(0);
    }

    match format {
        ExportFormat::Csv => export_csv(rows, path)?,
        ExportFormat::Json => export_json(rows, path)?,
    }
    Ok(rows.len())
}
