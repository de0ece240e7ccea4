use super::CommandContext;
use crate::cli::parser::Commands;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::header;
use crate::utils::formatting::{colored_status, hhmm, hours2readable, mins2readable};
use crate::utils::date::parse_date;

pub fn handle(cmd: &Commands, ctx: &CommandContext) -> AppResult<()> {
    let Commands::Summary { worker, date } = cmd else {
        return Ok(());
    };

    let date = match date {
        Some(d) => parse_date(d).ok_or_else(|| AppError::InvalidDate(d.clone()))?,
        None => ctx.tracker.today(),
    };

    let summary = ctx.tracker.daily_summary_for(worker, date)?;

    ctx.emit(&summary, |s| {
        header(format!("{worker} · {}", s.date));

        let status = s
            .session_status
            .map(colored_status)
            .unwrap_or_else(|| "not checked in".to_string());
        println!("Session          : {status}");
        if let Some(h) = s.session_hours {
            println!("Session hours    : {}", hours2readable(h));
        }
        println!("Activity hours   : {}", hours2readable(s.today_hours));
        println!("Active activities: {}", s.active_activity_count);
        println!("Completed today  : {}", s.completed_today_count);

        if !s.gaps.is_empty() {
            println!(
                "Idle gaps        : {} total",
                mins2readable(s.total_gap_minutes(), false, false)
            );
            for g in &s.gaps {
                println!(
                    "  {} → {} ({} min)",
                    hhmm(&g.start),
                    hhmm(&g.end),
                    g.duration_minutes
                );
            }
        }
    })
}
