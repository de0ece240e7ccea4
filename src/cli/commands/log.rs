use super::CommandContext;
use crate::cli::parser::Commands;
use crate::core::log::LogLogic;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, ctx: &CommandContext) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let entries = ctx.tracker.audit_log()?;
        if ctx.json {
            crate::ui::messages::json(&entries)?;
        } else {
            LogLogic::print_log(&entries);
        }
    }

    Ok(())
}
