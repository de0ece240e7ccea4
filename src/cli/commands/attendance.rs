use super::{CommandContext, print_session, resolve_location};
use crate::cli::parser::Commands;
use crate::core::attendance::CheckoutOutcome;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::utils::date::parse_date;
use crate::utils::formatting::hhmm;
use crate::utils::time::parse_time;

pub fn handle(cmd: &Commands, ctx: &CommandContext) -> AppResult<()> {
    let tracker = ctx.tracker;
    let attendance = tracker.attendance();

    match cmd {
        Commands::CheckIn { worker, location } => {
            let location = resolve_location(location, tracker)?;
            let session = attendance.check_in(worker, location)?;
            ctx.emit(&session, |s| {
                success(format!("{} checked in at {}", s.worker_id, hhmm(&s.check_in_at)));
                print_session(s);
            })
        }

        Commands::CheckOut {
            worker,
            session,
            confirm_early,
            location,
        } => {
            let session_id = resolve_session_id(ctx, worker.as_deref(), *session)?;
            let location = resolve_location(location, tracker)?;

            let outcome = attendance.check_out(session_id, location, *confirm_early)?;
            ctx.emit(&outcome, |o| match o {
                CheckoutOutcome::Committed(s) => {
                    success(format!("Session #{} closed: {}", s.id, s.status));
                    print_session(s);
                }
                CheckoutOutcome::RequiresConfirmation(req) => {
                    warning(&req.message);
                    info("Nothing was changed. Run again with --confirm-early to check out now.");
                }
            })
        }

        Commands::ReCheckIn {
            worker,
            session,
            location,
        } => {
            let session_id = resolve_session_id(ctx, worker.as_deref(), *session)?;
            let location = resolve_location(location, tracker)?;
            let session = attendance.re_check_in(session_id, location)?;
            ctx.emit(&session, |s| {
                success(format!("Session #{} resumed", s.id));
                print_session(s);
            })
        }

        Commands::AutoCheckout { date, cutoff } => {
            let date = match date {
                Some(d) => parse_date(d).ok_or_else(|| AppError::InvalidDate(d.clone()))?,
                None => tracker.today(),
            };
            let cutoff = cutoff
                .as_deref()
                .map(|c| parse_time(c).ok_or_else(|| AppError::InvalidTime(c.to_string())))
                .transpose()?;

            let closed = attendance.auto_checkout_day(date, cutoff)?;
            ctx.emit(&closed, |closed| {
                if closed.is_empty() {
                    info(format!("No open sessions on {date}."));
                }
                for s in closed {
                    success(format!(
                        "Session #{} of {} auto checked out at {}",
                        s.id,
                        s.worker_id,
                        s.check_out_at.as_ref().map(hhmm).unwrap_or_default()
                    ));
                }
            })
        }

        _ => Ok(()),
    }
}

/// Explicit `--session`, else the worker's session of today.
fn resolve_session_id(
    ctx: &CommandContext,
    worker: Option<&str>,
    session: Option<i64>,
) -> AppResult<i64> {
    if let Some(id) = session {
        return Ok(id);
    }

    let worker = worker.ok_or_else(|| AppError::NotFound("either --worker or --session".into()))?;
    ctx.tracker
        .attendance()
        .today_session(worker)?
        .map(|s| s.id)
        .ok_or_else(|| AppError::NotFound(format!("session of today for worker '{worker}'")))
}
