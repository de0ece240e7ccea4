use crate::db::log::LogEntry;
use crate::utils::table::strip_ansi;
use ansi_term::Colour;

const OP_WIDTH_LIMIT: usize = 40;

/// ANSI colour of an audit-log operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "check_in" | "re_check_in" => Colour::Green,
        "check_out" => Colour::Cyan,
        "auto_checkout" => Colour::Purple,
        "activity_start" => Colour::Yellow,
        "activity_end" => Colour::Blue,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    /// One line per entry: `id: date | operation (target) => message`.
    pub fn render(entries: &[LogEntry]) -> Vec<String> {
        let date_of = |e: &LogEntry| {
            chrono::DateTime::parse_from_rfc3339(&e.date)
                .map(|dt| dt.format("%F %T").to_string())
                .unwrap_or_else(|_| e.date.clone())
        };

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let op_w = entries
            .iter()
            .map(|e| op_target(e).chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH_LIMIT);

        entries
            .iter()
            .map(|e| {
                let color = color_for_operation(&e.operation);
                let mut visible = op_target(e);
                if visible.chars().count() > OP_WIDTH_LIMIT {
                    visible = visible.chars().take(OP_WIDTH_LIMIT - 3).collect::<String>() + "...";
                }

                // Only the operation word is coloured.
                let colored = match visible.split_once(' ') {
                    Some((op, rest)) => format!("{} {}", color.paint(op), rest),
                    None => color.paint(visible.as_str()).to_string(),
                };
                let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&colored).chars().count()));

                format!(
                    "{:>id_w$}: {} | {}{} => {}",
                    e.id,
                    date_of(e),
                    colored,
                    padding,
                    e.message,
                    id_w = id_w
                )
            })
            .collect()
    }

    pub fn print_log(entries: &[LogEntry]) {
        println!("📜 Internal log:\n");
        for line in Self::render(entries) {
            println!("{line}");
        }
    }
}

fn op_target(e: &LogEntry) -> String {
    if e.target.is_empty() {
        e.operation.clone()
    } else {
        format!("{} ({})", e.operation, e.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_align_on_visible_width() {
        let entries = vec![
            LogEntry {
                id: 1,
                date: "2025-03-10T09:00:00+01:00".into(),
                operation: "check_in".into(),
                target: "w1".into(),
                message: "opened".into(),
            },
            LogEntry {
                id: 12,
                date: "2025-03-10T16:00:00+01:00".into(),
                operation: "check_out".into(),
                target: "worker-with-a-long-name".into(),
                message: "closed".into(),
            },
        ];

        let lines: Vec<String> = LogLogic::render(&entries).iter().map(|l| strip_ansi(l)).collect();

        assert_eq!(lines[0].find("=>"), lines[1].find("=>"));
        assert!(lines[0].starts_with(" 1: 2025-03-10 09:00:00 | check_in (w1)"));
    }
}
