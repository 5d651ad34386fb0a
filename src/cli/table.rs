//! Fixed-column rendering of the transaction list.

use tally_domain::{format_amount, Transaction, TransactionKind};

use crate::cli::output::current_preferences;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: &'static str,
    pub min_width: usize,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    const fn new(header: &'static str, min_width: usize, alignment: Alignment) -> Self {
        Self {
            header,
            min_width,
            max_width: None,
            alignment,
        }
    }

    const fn capped(self, max_width: usize) -> Self {
        Self {
            max_width: Some(max_width),
            ..self
        }
    }
}

pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub padding: usize,
}

impl Table {
    /// Widest of header, cells and `min_width`, clamped to `max_width`.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let widest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| visible_width(cell))
                    .max()
                    .unwrap_or(0);
                let width = widest
                    .max(visible_width(column.header))
                    .max(column.min_width);
                column.max_width.map_or(width, |max| width.min(max))
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let headers: Vec<String> = self.columns.iter().map(|c| c.header.to_string()).collect();

        let mut lines = vec![self.render_row(&headers, &widths), self.rule(&widths)];
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        lines.join("\n")
    }

    fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        self.columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (column, width))| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(text, *width, column.alignment, self.padding)
            })
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    }

    fn rule(&self, widths: &[usize]) -> String {
        let total: usize = widths.iter().map(|w| w + self.padding * 2).sum::<usize>()
            + widths.len().saturating_sub(1);
        let ch = if current_preferences().plain_mode { '-' } else { '─' };
        ch.to_string().repeat(total)
    }
}

/// Character count ignoring ANSI escape sequences.
pub fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            if chars.next() == Some('[') {
                for next in chars.by_ref() {
                    if ('\u{40}'..='\u{7e}').contains(&next) {
                        break;
                    }
                }
            }
            continue;
        }
        width += 1;
    }
    width
}

fn truncate(text: &str, width: usize) -> String {
    if visible_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

pub fn render_cell(text: &str, width: usize, alignment: Alignment, padding: usize) -> String {
    let fitted = truncate(text, width);
    let fill = " ".repeat(width.saturating_sub(visible_width(&fitted)));
    let pad = " ".repeat(padding);
    match alignment {
        Alignment::Left => format!("{pad}{fitted}{fill}{pad}"),
        Alignment::Right => format!("{pad}{fill}{fitted}{pad}"),
    }
}

const TRANSACTION_COLUMNS: [TableColumn; 5] = [
    TableColumn::new("Id", 2, Alignment::Right),
    TableColumn::new("Description", 12, Alignment::Left).capped(32),
    TableColumn::new("Type", 7, Alignment::Left),
    TableColumn::new("Amount", 8, Alignment::Right),
    TableColumn::new("Date", 10, Alignment::Left),
];

/// Kind shown the way the backend names it: `REVENUE` or `DEPENSE`.
fn kind_cell(kind: TransactionKind) -> String {
    kind.wire_name().to_string()
}

pub fn transaction_table(transactions: &[Transaction]) -> Table {
    Table {
        columns: TRANSACTION_COLUMNS.to_vec(),
        rows: transactions
            .iter()
            .map(|txn| {
                vec![
                    txn.id.to_string(),
                    txn.description.clone(),
                    kind_cell(txn.kind),
                    format_amount(txn.amount),
                    txn.date.to_string(),
                ]
            })
            .collect(),
        padding: 1,
    }
}

pub fn balance_line(balance: f64, currency_label: &str) -> String {
    let amount = format_amount(balance);
    if currency_label.is_empty() {
        format!("Balance: {amount}")
    } else {
        format!("Balance: {amount} {currency_label}")
    }
}
