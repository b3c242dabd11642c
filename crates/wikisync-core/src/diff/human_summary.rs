//! Human-readable summary renderer for deltas.

use crate::model::{Category, Delta};

const MAX_LISTED: usize = 10;

/// Render a short text summary of a [`Delta`].
///
/// Informational only, used by the CLI and debug logging.
pub fn render_human_summary(delta: &Delta) -> String {
    if delta.is_empty() {
        return "No changes.\n".to_string();
    }

    let mut out = format!("{} changed field(s)\n", delta.len());
    for category in Category::ALL {
        let count = delta.category_len(category);
        if count == 0 {
            continue;
        }
        out.push_str(&format!("- {} ({}):", category, count));
        let entries: Vec<String> = match category {
            Category::Varbit => listed(delta.varb.iter()),
            Category::Varp => listed(delta.varp.iter()),
            Category::Level => listed(delta.level.iter()),
        };
        out.push(' ');
        out.push_str(&entries.join(", "));
        if count > MAX_LISTED {
            out.push_str(&format!(", … {} more", count - MAX_LISTED));
        }
        out.push('\n');
    }
    out
}

fn listed<'a, K, I>(entries: I) -> Vec<String>
where
    K: std::fmt::Display + 'a,
    I: Iterator<Item = (&'a K, &'a i32)>,
{
    entries
        .take(MAX_LISTED)
        .map(|(key, value)| format!("{}={}", key, value))
        .collect()
}
