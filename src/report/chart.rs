//! Text bar charts for component vectors.
//!
//! Each row is one vector entry. The axis `│` sits in the middle of the
//! chart; positive values grow to the right, negative values to the left,
//! scaled to the largest magnitude.

const BAR: char = '█';
const AXIS: char = '│';

/// Render `values` as a horizontal bar chart `width` cells wide
pub fn bar_chart(title: &str, labels: &[&str], values: &[f64], width: usize) -> Vec<String> {
    let half = (width / 2).max(1);
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let scale = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));

    let mut lines = Vec::with_capacity(values.len() + 2);
    lines.push(title.to_string());
    lines.push("─".repeat(label_width + 2 * half + 10));

    for (i, &v) in values.iter().enumerate() {
        let label = labels.get(i).copied().unwrap_or("");
        let len = if scale > 0.0 {
            ((v.abs() / scale) * half as f64).round() as usize
        } else {
            0
        }
        .min(half);

        let (left, right) = if v < 0.0 {
            (
                format!("{}{}", " ".repeat(half - len), BAR.to_string().repeat(len)),
                " ".repeat(half),
            )
        } else {
            (
                " ".repeat(half),
                format!("{}{}", BAR.to_string().repeat(len), " ".repeat(half - len)),
            )
        };

        lines.push(format!(
            "{:>lw$} {}{}{} {:+.3}",
            label,
            left,
            AXIS,
            right,
            v,
            lw = label_width
        ));
    }

    lines
}

/// Place two blocks of lines next to each other, `gap` spaces apart
pub fn side_by_side(left: &[String], right: &[String], gap: usize) -> String {
    let left_width = left.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let rows = left.len().max(right.len());
    let mut out = String::new();

    for i in 0..rows {
        let l = left.get(i).map(String::as_str).unwrap_or("");
        let r = right.get(i).map(String::as_str).unwrap_or("");
        let pad = left_width - l.chars().count() + gap;
        let line = format!("{}{}{}", l, " ".repeat(pad), r);
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}
