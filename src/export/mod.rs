mod fs_utils;
mod json_csv;
pub mod logic;
mod model;

pub use logic::{ExportLogic, ExportRequest};
pub use model::{ActivityExport, SessionExport};

use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

pub(crate) fn notify_export_success(label: &str, path: &Path, rows: usize) {
    success(format!(
        "{label} export completed: {rows} row(s) written to {}",
        path.display()
    ));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Which records an export contains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportKind {
    #[default]
    Sessions,
    Activities,
}
