use super::{CommandContext, no_data, print_activity, resolve_location};
use crate::cli::parser::{ActivityCommands, Commands};
use crate::core::calculator::TimeWindow;
use crate::errors::{AppError, AppResult};
use crate::models::activity::{ActivityRecord, ActivityType, NewActivity};
use crate::ui::messages::{header, success};
use crate::utils::date::resolve_period;
use crate::utils::time::parse_optional_timestamp;

pub fn handle(cmd: &Commands, ctx: &CommandContext) -> AppResult<()> {
    let Commands::Activity { action } = cmd else {
        return Ok(());
    };

    let tracker = ctx.tracker;
    let ledger = tracker.activities();
    let today = tracker.today();

    match action {
        ActivityCommands::Start {
            worker,
            activity_type,
            title,
            description,
            ticket,
            start,
            location,
        } => {
            let kind = ActivityType::from_code(activity_type)
                .ok_or_else(|| AppError::InvalidActivityType(activity_type.clone()))?;

            let mut new = NewActivity::new(kind, title.as_str())
                .location(resolve_location(location, tracker)?);
            if let Some(d) = description {
                new = new.description(d.as_str());
            }
            if let Some(t) = ticket {
                new = new.linked_ticket(t.as_str());
            }
            if let Some(at) = parse_optional_timestamp(start.as_ref(), today)? {
                new = new.starting_at(at);
            }

            let record = ledger.start_activity(worker, new)?;
            ctx.emit(&record, |a| {
                success(format!("Activity #{} started", a.id));
                print_activity(a);
            })
        }

        ActivityCommands::End { id, worker, end } => {
            let activity_id = match (id, worker) {
                (Some(id), _) => *id,
                (None, Some(w)) => ledger
                    .current_activity(w)?
                    .map(|a| a.id)
                    .ok_or_else(|| AppError::NotFound(format!("ongoing activity for '{w}'")))?,
                (None, None) => {
                    return Err(AppError::NotFound("either --id or --worker".into()));
                }
            };
            let end = parse_optional_timestamp(end.as_ref(), today)?;

            let record = ledger.end_activity(activity_id, end)?;
            ctx.emit(&record, |a| {
                success(format!("Activity #{} ended", a.id));
                print_activity(a);
            })
        }

        ActivityCommands::List { worker, period } => {
            let (first, last) = match period {
                Some(p) => resolve_period(p)?,
                None => (today, today),
            };
            let from = TimeWindow::for_date(first)?.start;
            let to = TimeWindow::for_date(last)?.end - chrono::TimeDelta::milliseconds(1);

            let listing = ledger.list_activities(worker, from, to);
            let records = listing.iter().collect::<AppResult<Vec<ActivityRecord>>>()?;

            ctx.emit(&records, |records| {
                if records.is_empty() {
                    no_data("activities");
                    return;
                }
                header(format!("Activities of {worker} ({first} → {last})"));
                for a in records {
                    print_activity(a);
                }
            })
        }

        ActivityCommands::Current { worker } => {
            let current = ledger.current_activity(worker)?;
            ctx.emit(&current, |current| match current {
                Some(a) => print_activity(a),
                None => no_data("ongoing activity"),
            })
        }
    }
}
