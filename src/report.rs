use std::io::{self, Write};

use crate::app::App;
use crate::ui::bucket_table::format_mean;
use crate::ui::metric_name;

/// Plain-text rendering of a chart, for pipes and non-interactive terminals
pub fn write_report<W: Write>(w: &mut W, app: &App) -> io::Result<()> {
    let metric = app.chart.metric();
    let output = &app.output;

    writeln!(w, "{}", app.title)?;
    writeln!(
        w,
        "{} sessions, {} excluded (grade E)",
        output.kept.len(),
        output.excluded.len()
    )?;

    if output.buckets.is_empty() {
        writeln!(w, "no sessions left after filtering")?;
        return Ok(());
    }

    let mean_header = format!("mean {}", metric_name(metric));
    writeln!(w)?;
    writeln!(
        w,
        "{:<12} {:<16} {:>20} {:>8}",
        "group", "player", mean_header, "sessions"
    )?;
    for bucket in &output.buckets {
        writeln!(
            w,
            "{:<12} {:<16} {:>20} {:>8}",
            bucket.key.to_string(),
            bucket.player.as_deref().unwrap_or("all"),
            format_mean(bucket.mean, metric),
            bucket.count
        )?;
    }

    Ok(())
}
