use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use anyhow::Result;
use clap::Args;
use holdline_config::MAX_RECENT_CALLS;
use holdline_core::dto::{AnalyticsDto, CallerTotalsDto};
use holdline_core::time::{format_timestamp, now_utc};
use holdline_store::Store;

#[derive(Debug, Args)]
pub struct AnalyticsArgs {
    /// Number of recent calls to include (defaults to analytics.recent_calls)
    #[arg(long)]
    pub recent: Option<i64>,
}

pub fn analytics(ctx: &Context<'_>, store: &Store, args: AnalyticsArgs) -> Result<()> {
    let recent = args.recent.unwrap_or(ctx.config.analytics.recent_calls);
    if !(1..=MAX_RECENT_CALLS).contains(&recent) {
        return Err(invalid_input(format!(
            "--recent must be between 1 and {MAX_RECENT_CALLS}"
        )));
    }

    let snapshot =
        store
            .analytics()
            .snapshot(now_utc(), recent, ctx.config.active_window_secs())?;

    if ctx.json {
        return print_json(&snapshot);
    }
    print_snapshot(&snapshot);
    Ok(())
}

fn print_snapshot(snapshot: &AnalyticsDto) {
    match &snapshot.longest_hold {
        Some(hold) => println!(
            "longest hold:  {} ({}, {})",
            hold.from_number_display,
            format_duration(hold.duration_seconds),
            place(hold.city.as_deref(), hold.state.as_deref())
        ),
        None => println!("longest hold:  -"),
    }
    print_caller("most calls:   ", snapshot.most_calls.as_ref());
    print_caller("most time:    ", snapshot.total_time.as_ref());
    match &snapshot.geo_leader {
        Some(region) => println!(
            "top region:    {} ({} calls)",
            place(region.state.as_deref(), region.country.as_deref()),
            region.total_calls
        ),
        None => println!("top region:    -"),
    }

    println!();
    println!("on hold now: {}", snapshot.active_calls.len());
    for call in &snapshot.active_calls {
        println!(
            "  {}  {}",
            call.from_number_display,
            format_duration(call.current_duration_seconds)
        );
    }

    println!();
    println!("recent calls:");
    if snapshot.recent_calls.is_empty() {
        println!("  none");
    }
    for call in &snapshot.recent_calls {
        println!(
            "  {}  {}  {}",
            format_timestamp(call.start_time),
            call.from_number_display,
            call.duration_seconds
                .map(format_duration)
                .unwrap_or_else(|| "-".to_string())
        );
    }
}

fn print_caller(label: &str, totals: Option<&CallerTotalsDto>) {
    match totals {
        Some(totals) => println!(
            "{label} {} ({} calls, {})",
            totals.from_number_display,
            totals.total_calls,
            format_duration(totals.total_duration_seconds)
        ),
        None => println!("{label} -"),
    }
}

pub(crate) fn place(first: Option<&str>, second: Option<&str>) -> String {
    match (first, second) {
        (Some(first), Some(second)) => format!("{first}, {second}"),
        (Some(value), None) | (None, Some(value)) => value.to_string(),
        (None, None) => "unknown location".to_string(),
    }
}

pub(crate) fn format_duration(seconds: i64) -> String {
    let minutes = seconds / 60;
    let rest = seconds % 60;
    if minutes == 0 {
        format!("{rest}s")
    } else {
        format!("{minutes}m {rest:02}s")
    }
}
