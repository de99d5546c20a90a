use crate::cli::DashboardArgs;
use crate::dashboard::{Dashboard, DayBucket, SeverityCount, StatusCounts};
use crate::sort::{SortDirection, SortKey, SortState};
use crate::types::{BugRecord, Severity, Status};
use anyhow::Result;
use colored::*;

const BAR_WIDTH: usize = 40;

pub fn print_banner() {
    println!("\n{}", "╔═══════════════════════════════════════════════════════════════════════════════╗".bright_black());
    println!(
        "{}{}{}",
        "║  ".bright_black(),
        format!("strikelog v{:<10}", env!("CARGO_PKG_VERSION")).bold().cyan(),
        "                                                 ║".bright_black()
    );
    println!(
        "{}{}{}",
        "║  ".bright_black(),
        "Admin dashboard for the StrikeLog bug tracker".italic(),
        "                                ║".bright_black()
    );
    println!("{}", "╚═══════════════════════════════════════════════════════════════════════════════╝".bright_black());
}

pub fn print_legend() {
    println!("\n{}", "SEVERITY WEIGHTS".bold().white());
    println!("{}", "═".repeat(80).bright_black());
    for severity in Severity::KNOWN {
        println!("  {:<10} {}", severity_label(severity), severity.weight());
    }
    println!("  {:<10} {}", "other".bright_black(), Severity::Unclassified.weight());

    println!("\n{}", "STATUS LIFECYCLE".bold().white());
    println!("{}", "═".repeat(80).bright_black());
    println!("  Open ⇄ In Progress ⇄ Resolved → Closed → In Progress (reopen)");
    println!("  Closing is only possible once a bug is Resolved.");
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Blocker => "Blocker".purple().bold(),
        Severity::Critical => "Critical".red().bold(),
        Severity::High => "High".yellow().bold(),
        Severity::Medium => "Medium".yellow(),
        Severity::Low => "Low".cyan(),
        Severity::Unclassified => "?".bright_black(),
    }
}

fn status_label(status: Status) -> ColoredString {
    match status {
        Status::Open => "Open".red(),
        Status::InProgress => "In Progress".yellow(),
        Status::Resolved => "Resolved".blue(),
        Status::Closed => "Closed".green(),
        Status::Unclassified => "?".bright_black(),
    }
}

pub fn print_report(dashboard: &Dashboard, args: &DashboardArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(dashboard)?);
        return Ok(());
    }

    print_stats(&dashboard.counts);
    print_histogram(&dashboard.severity);

    if args.summary {
        return Ok(());
    }

    print_active(&dashboard.partition.active, dashboard);
    print_completed(&dashboard.partition.completed);
    print_weekly(&dashboard.weekly);
    Ok(())
}

fn print_stats(counts: &StatusCounts) {
    println!("\n{}", "═".repeat(80).bright_black());
    println!("{}", "ADMIN DASHBOARD".bold().white());
    println!("{}\n", "═".repeat(80).bright_black());

    println!(
        "   {} {} {}",
        "●".yellow(),
        format!("Open Issues:        {}", counts.open).yellow().bold(),
        format!("({} in progress)", counts.in_progress).bright_black()
    );
    println!("   {} {}", "●".green(), format!("Total Closed:       {}", counts.closed).green().bold());
    println!("   {} {}", "●".red(), format!("Critical / Blocker: {}", counts.critical).red().bold());
    println!("   {} {}", "●".bright_black(), format!("Total Reports:      {}", counts.total).bold());
}

fn sort_indicator(sort: &SortState) -> String {
    let Some(key) = sort.key else {
        return "unsorted".to_string();
    };
    let column = match key {
        SortKey::Severity => "severity",
        SortKey::Created => "created",
        SortKey::Title => "title",
        SortKey::Status => "status",
    };
    let arrow = match sort.direction {
        SortDirection::Descending => "▼",
        SortDirection::Ascending => "▲",
    };
    format!("{} {}", column, arrow)
}

fn print_active(active: &[&BugRecord], dashboard: &Dashboard) {
    println!("\n{}", "═".repeat(80).bright_black());
    println!(
        "{} {} {}",
        "ACTIVE".bold(),
        format!("({})", active.len()).yellow().bold(),
        sort_indicator(&dashboard.sort).bright_black()
    );
    println!("{}", "─".repeat(80).bright_black());

    if active.is_empty() {
        println!("{}", "No active issues. Great work!".italic());
        return;
    }

    for (i, bug) in active.iter().enumerate() {
        let fixable = if bug.status == Status::Resolved {
            "✔ ready to close".green()
        } else {
            "".normal()
        };
        println!(
            "\n{}. {} [{}] {} {}",
            i + 1,
            bug.title.bold(),
            severity_label(bug.severity),
            status_label(bug.status),
            fixable
        );
        println!("   Id:       {}", bug.id.bright_black());
        if !bug.description.is_empty() {
            let short: String = bug.description.chars().take(70).collect();
            println!("   Details:  {}", short);
        }
        if bug.has_evidence() {
            println!("   Evidence: {}", bug.affected_file.cyan());
        }
    }
}

fn print_completed(completed: &[&BugRecord]) {
    println!("\n{}", "═".repeat(80).bright_black());
    println!("{} {}", "COMPLETED".bold(), format!("({})", completed.len()).green().bold());
    println!("{}", "─".repeat(80).bright_black());

    if completed.is_empty() {
        println!("{}", "No closed issues yet.".italic());
        return;
    }

    for bug in completed {
        let closed = bug
            .closed_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} {:<40} {:<16} {}",
            "✓".green(),
            bug.title.strikethrough().bright_black(),
            bug.reporter_or_unknown(),
            closed.bright_black()
        );
    }
}

pub fn print_reporter_view(reporter: &str, bugs: &[&BugRecord], sort: &SortState, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(bugs)?);
        return Ok(());
    }

    println!("\n{}", "═".repeat(80).bright_black());
    println!(
        "{} {} {}",
        "MY REPORTED ISSUES".bold(),
        format!("({}, {})", reporter, bugs.len()).cyan(),
        sort_indicator(sort).bright_black()
    );
    println!("{}", "─".repeat(80).bright_black());

    if bugs.is_empty() {
        println!("{}", "You haven't reported any bugs yet.".italic());
        return Ok(());
    }

    for bug in bugs {
        let file = if bug.has_evidence() { bug.affected_file.as_str() } else { "-" };
        println!(
            "  {:<36} {:<12} {:<10} {} {}",
            bug.title.bold(),
            status_label(bug.status),
            severity_label(bug.severity),
            bug.created_at.format("%Y-%m-%d").to_string().bright_black(),
            file.cyan()
        );
    }
    Ok(())
}

pub fn print_submitted(bug: &BugRecord) {
    println!(
        "{} Bug reported: {} [{}] {}",
        "🐞".green(),
        bug.title.bold(),
        severity_label(bug.severity),
        bug.id.bright_black()
    );
}

fn bar(count: usize, max: usize) -> String {
    if max == 0 || count == 0 {
        return String::new();
    }
    "█".repeat((count * BAR_WIDTH).div_ceil(max))
}

fn print_histogram(histogram: &[SeverityCount]) {
    println!("\n{}", "BUGS BY SEVERITY".bold());
    println!("{}", "─".repeat(80).bright_black());

    let max = histogram.iter().map(|s| s.count).max().unwrap_or(0);
    for entry in histogram {
        println!(
            "  {:<10} {:>4} {}",
            severity_label(entry.severity),
            entry.count,
            bar(entry.count, max)
        );
    }
}

fn print_weekly(series: &[DayBucket]) {
    println!("\n{}", "═".repeat(80).bright_black());
    println!("{}", "WEEKLY VOLUME".bold());
    println!("{}", "─".repeat(80).bright_black());
    println!("  {:<8} {:>9} {:>7}", "", "New Bugs", "Closed");

    for day in series {
        println!(
            "  {:<8} {:>9} {:>7}",
            day.date.format("%b %-d").to_string(),
            day.submitted.to_string().red(),
            day.resolved.to_string().green()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_scale_to_the_largest_bucket() {
        assert_eq!(bar(0, 10), "");
        assert_eq!(bar(5, 0), "");
        assert_eq!(bar(10, 10).chars().count(), BAR_WIDTH);
        assert_eq!(bar(1, 3).chars().count(), 14);
    }

    #[test]
    fn sort_indicator_names_column_and_direction() {
        assert_eq!(sort_indicator(&SortState::default()), "unsorted");
        let state = SortState::from_clicks(&[SortKey::Title, SortKey::Title]);
        assert_eq!(sort_indicator(&state), "title ▲");
    }
}
