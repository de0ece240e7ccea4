use super::{CommandContext, no_data};
use crate::cli::parser::Commands;
use crate::db::sessions;
use crate::errors::AppResult;
use crate::utils::colors::{colorize_in_out, colorize_optional};
use crate::utils::date::{month_of, resolve_period};
use crate::utils::formatting::{colored_status, hhmm, hours2readable, optional_hhmm};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, ctx: &CommandContext) -> AppResult<()> {
    let Commands::Sessions { worker, period } = cmd else {
        return Ok(());
    };

    let (from, to) = match period {
        Some(p) => resolve_period(p)?,
        None => month_of(ctx.tracker.today())?,
    };

    let rows = ctx
        .tracker
        .pool()
        .with_conn(|conn| sessions::in_range(conn, worker.as_deref(), &from, &to))?;

    ctx.emit(&rows, |rows| {
        if rows.is_empty() {
            no_data("sessions");
            return;
        }

        let mut table = Table::new(vec![
            Column::new("ID", 5),
            Column::new("DATE", 10),
            Column::new("WORKER", 14),
            Column::new("IN", 5),
            Column::new("OUT", 5),
            Column::new("STATUS", 16),
            Column::new("HOURS", 8),
        ]);

        for s in rows {
            table.add_row(vec![
                s.id.to_string(),
                s.calendar_date.to_string(),
                s.worker_id.clone(),
                colorize_in_out(&hhmm(&s.check_in_at), true),
                colorize_in_out(&optional_hhmm(s.check_out_at.as_ref()), false),
                colored_status(s.status),
                s.total_hours
                    .map(hours2readable)
                    .unwrap_or_else(|| colorize_optional("--")),
            ]);
        }

        print!("{}", table.render());
    })
}
