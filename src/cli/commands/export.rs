use super::CommandContext;
use crate::cli::parser::Commands;
use crate::errors::AppResult;
use crate::export::{ExportLogic, ExportRequest};

pub fn handle(cmd: &Commands, ctx: &CommandContext) -> AppResult<()> {
    if let Commands::Export {
        format,
        kind,
        file,
        range,
        worker,
        force,
    } = cmd
    {
        let request = ExportRequest {
            format: *format,
            kind: *kind,
            file,
            range: range.as_deref(),
            worker_id: worker.as_deref(),
            force: *force,
        };
        ExportLogic::export(ctx.tracker.pool(), &request)?;
    }
    Ok(())
}
