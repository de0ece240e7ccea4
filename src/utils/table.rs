//! Table rendering utilities for CLI outputs.

use regex::Regex;
use std::sync::LazyLock;

static ANSI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1B\[[0-9;]*[mK]").unwrap_or_else(|_| unreachable!("static pattern"))
});

/// Remove ANSI escape sequences, leaving only the visible text.
pub fn strip_ansi(s: &str) -> String {
    ANSI.replace_all(s, "").into_owned()
}

pub struct Column {
    pub header: String,
    pub width: usize,
}

impl Column {
    pub fn new(header: &str, width: usize) -> Self {
        Self {
            header: header.to_string(),
            width,
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        // Header
        for col in &self.columns {
            out.push_str(&format!("{:<width$} ", col.header, width = col.width));
        }
        out.push('\n');

        // Rows: padding is computed on the visible width so colored cells line up
        for row in &self.rows {
            for (i, col) in self.columns.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                let visible = strip_ansi(cell).chars().count();
                out.push_str(cell);
                out.push_str(&" ".repeat(col.width.saturating_sub(visible) + 1));
            }
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_on_visible_width() {
        let mut t = Table::new(vec![Column::new("A", 4), Column::new("B", 2)]);
        t.add_row(vec!["\x1b[32mok\x1b[0m".into(), "x".into()]);

        let rendered = t.render();
        let second = strip_ansi(rendered.lines().nth(1).unwrap());
        assert_eq!(second, "ok   x  ");
    }
}
