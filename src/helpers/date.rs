//! Date helper functions

use chrono::NaiveDateTime;

/// Format a date using a Moment.js-style format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "MMMM D, YYYY") // -> "June 1, 2023"
/// ```
pub fn format_date(date: &NaiveDateTime, format: &str) -> String {
    date.format(&moment_to_chrono_format(format)).to_string()
}

/// Format in ISO 8601, for `<time datetime>` attributes
pub fn date_xml(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Convert Moment.js format tokens to chrono ones
fn moment_to_chrono_format(format: &str) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    let chars: Vec<char> = format.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let run = chars[i..].iter().take_while(|&&x| x == c).count();

        let (token, used) = match (c, run) {
            ('Y', n) if n >= 4 => ("%Y", 4),
            ('Y', n) if n >= 2 => ("%y", 2),
            ('M', n) if n >= 4 => ("%B", 4),
            ('M', 3) => ("%b", 3),
            ('M', 2) => ("%m", 2),
            ('M', 1) => ("%-m", 1),
            ('D', n) if n >= 4 => ("%j", 4),
            ('D', 2 | 3) => ("%d", 2),
            ('D', 1) => ("%-d", 1),
            ('d', n) if n >= 4 => ("%A", 4),
            ('d', 3) => ("%a", 3),
            ('H', n) if n >= 2 => ("%H", 2),
            ('H', 1) => ("%-H", 1),
            ('h', n) if n >= 2 => ("%I", 2),
            ('h', 1) => ("%-I", 1),
            ('m', n) if n >= 2 => ("%M", 2),
            ('s', n) if n >= 2 => ("%S", 2),
            ('A', _) => ("%p", 1),
            ('%', _) => ("%%", 1),
            _ => ("", 0),
        };

        if used == 0 {
            out.push(c);
            i += 1;
        } else {
            out.push_str(token);
            i += used;
        }
    }

    out
}
