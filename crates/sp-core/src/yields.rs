//! Per-channel yield bookkeeping and the LaTeX yield table.

use crate::process::{DATA, display_name, is_signal};

/// Column key for the channel-summed yield.
pub const TOTAL: &str = "total";

/// `"<value> ± <error>"` with the value at one decimal and the error at the
/// same number of decimals.
pub fn format_yield(integral: f64, error: f64) -> String {
    format_with_separator(integral, error, " ± ")
}

/// LaTeX flavour of [`format_yield`].
pub fn format_yield_latex(integral: f64, error: f64) -> String {
    format_with_separator(integral, error, r" $\pm$ ")
}

fn format_with_separator(integral: f64, error: f64, sep: &str) -> String {
    let value = format!("{:.1}", integral);
    let digits = value.split_once('.').map_or(0, |(_, frac)| frac.len());
    format!("{}{}{:.*}", value, sep, digits, error)
}

/// Observed counts are printed as truncated integers.
pub fn format_data_yield(integral: f64) -> String {
    format!("{}", integral.trunc() as i64)
}

/// Yield and error for one process, per channel plus the total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YieldEntry {
    channels: Vec<(String, (f64, f64))>,
    total: (f64, f64),
}

impl YieldEntry {
    pub fn channel(&self, channel: &str) -> (f64, f64) {
        self.channels
            .iter()
            .find(|(c, _)| c == channel)
            .map_or((0.0, 0.0), |(_, v)| *v)
    }

    pub fn total(&self) -> (f64, f64) {
        self.total
    }
}

/// Ordered record of process yields. Rows keep insertion order.
#[derive(Debug, Clone)]
pub struct YieldTable {
    channels: Vec<String>,
    rows: Vec<(String, YieldEntry)>,
}

impl YieldTable {
    pub fn new(channels: &[String]) -> Self {
        Self { channels: channels.to_vec(), rows: Vec::new() }
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    fn entry_mut(&mut self, process: &str) -> &mut YieldEntry {
        let idx = match self.rows.iter().position(|(p, _)| p == process) {
            Some(i) => i,
            None => {
                self.rows.push((process.to_string(), YieldEntry::default()));
                self.rows.len() - 1
            }
        };
        &mut self.rows[idx].1
    }

    /// Record a yield. `channel` is either a channel name or [`TOTAL`].
    pub fn record(&mut self, process: &str, channel: &str, integral: f64, error: f64) {
        let entry = self.entry_mut(process);
        if channel == TOTAL {
            entry.total = (integral, error);
        } else if let Some(slot) = entry.channels.iter_mut().find(|(c, _)| c == channel) {
            slot.1 = (integral, error);
        } else {
            entry.channels.push((channel.to_string(), (integral, error)));
        }
    }

    pub fn get(&self, process: &str) -> Option<&YieldEntry> {
        self.rows.iter().find(|(p, _)| p == process).map(|(_, e)| e)
    }

    /// Move `process` to the end of the row order, if present.
    pub fn move_to_end(&mut self, process: &str) {
        if let Some(i) = self.rows.iter().position(|(p, _)| p == process) {
            let row = self.rows.remove(i);
            self.rows.push(row);
        }
    }

    pub fn processes(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(p, _)| p.as_str())
    }

    /// Render as a LaTeX `tabular`. Signal (aQGC) rows are omitted.
    pub fn to_latex(&self) -> String {
        let mut header = vec!["Process".to_string()];
        header.extend(self.channels.iter().map(|c| format!("\\{}", c)));
        header.push("Total Yield".to_string());

        let mut out = String::new();
        out.push_str(&format!("\\begin{{tabular}}{{l{}c}}\n", "c".repeat(self.channels.len())));
        out.push_str("\\hline\n");
        out.push_str(&header.join(" & "));
        out.push_str(" \\\\\n\\hline\n");

        for (process, entry) in &self.rows {
            if is_signal(process) {
                continue;
            }
            let fmt = |(v, e): (f64, f64)| {
                if process == DATA { format_data_yield(v) } else { format_yield_latex(v, e) }
            };
            let mut cells = vec![display_name(process).to_string()];
            cells.extend(self.channels.iter().map(|c| fmt(entry.channel(c))));
            cells.push(fmt(entry.total));
            out.push_str(&cells.join(" & "));
            out.push_str(" \\\\\n");
        }
        out.push_str("\\hline\n\\end{tabular}\n");
        out
    }
}
