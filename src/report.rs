//! Human-readable rendering of outcomes.

use std::{fmt::Write, time::Duration};

use crate::{GenerationRecord, usage_label};

const WIDTH: usize = 70;

/// Render a wait like `1.5 seconds`, `12.0 minutes` or `3.2 hours`.
pub fn format_wait(wait: Duration) -> String {
    let secs = wait.as_secs_f64();

    if secs < 90.0 {
        format!("{secs:.1} seconds")
    } else if secs < 3_600.0 {
        format!("{:.1} minutes", secs / 60.0)
    } else {
        format!("{:.1} hours", secs / 3_600.0)
    }
}

/// Render a successful generation as a boxed report.
pub fn render_report(record: &GenerationRecord) -> String {
    let heavy = "═".repeat(WIDTH);
    let light = "─".repeat(WIDTH);

    let origin = record
        .request
        .usage
        .as_deref()
        .map_or_else(|| "Any".to_string(), usage_label);

    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{heavy}");
    let _ = writeln!(out, "{} • {}", record.request.gender.label(), origin);
    let _ = writeln!(out, "{light}");

    if !record.names.names.is_empty() {
        let _ = writeln!(out, "Given name(s):  {}", record.names.names.join(" "));
    }

    if let Some(surname) = record.names.surname.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(out, "Surname:        {surname}");
    }

    let _ = writeln!(out, "{light}");
    let _ = writeln!(out, "Timestamp:      {}", record.human_timestamp);
    let _ = writeln!(out, "ISO Timestamp:  {}", record.iso_timestamp);
    let _ = writeln!(out, "{heavy}");

    out
}
