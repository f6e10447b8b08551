//! Text formatting for sidebar metrics and bar labels.

use bike_dash::SummaryStats;

/// `1234567` → `"1,234,567"`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `"2012-09-15 (8,714 bikes)"`, or `None` when nothing is in range.
pub fn busiest_day_line(summary: &SummaryStats) -> Option<String> {
    summary.busiest_day.as_ref().map(|r| {
        format!(
            "{} ({} bikes)",
            r.date().format("%Y-%m-%d"),
            format_count(r.rental_count())
        )
    })
}
