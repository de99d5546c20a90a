use anyhow::{Context, Result};
use chrono::Local;
use colored::*;
use strikelog::cli::{self, Command, DashboardArgs, MineArgs, SubmitArgs};
use strikelog::config::Config;
use strikelog::dashboard::{reporter_view, Dashboard};
use strikelog::lifecycle::{self, Applied};
use strikelog::report;
use strikelog::sort::SortState;
use strikelog::submission::NewBug;
use strikelog::types::Status;

fn main() -> Result<()> {
    let args = cli::parse();
    let config = Config::from_args(&args);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level)).init();
    log::debug!("resolved config: {:?}", config);

    match &args.command {
        Command::Legend => {
            report::print_legend();
            Ok(())
        }
        Command::Dashboard(dash) => run_dashboard(&config, dash),
        Command::Mine(mine) => run_mine(&config, mine),
        Command::Submit(submit) => run_submit(&config, submit),
        Command::SetStatus { id, status } => {
            let source = config.open_source()?;
            print_applied(&lifecycle::apply(source.as_ref(), id, *status)?);
            Ok(())
        }
        Command::Close { id } => {
            let source = config.open_source()?;
            print_applied(&lifecycle::apply(source.as_ref(), id, Status::Closed)?);
            Ok(())
        }
        Command::Reopen { id } => {
            let source = config.open_source()?;
            print_applied(&lifecycle::reopen(source.as_ref(), id)?);
            Ok(())
        }
        Command::Remove { id } => {
            let source = config.open_source()?;
            source.remove(id)?;
            println!("{} Removed bug {}", "🗑".red(), id.bold());
            Ok(())
        }
    }
}

fn run_dashboard(config: &Config, args: &DashboardArgs) -> Result<()> {
    let source = config.open_source()?;
    let bugs = source.list_bugs().context("Could not load bugs")?;

    let sort = SortState::from_clicks(&args.sort);
    let today = config.reference_date(args.today);
    let dashboard = Dashboard::build(&bugs, &sort, today, &Local);

    if !args.json {
        report::print_banner();
    }
    report::print_report(&dashboard, args)?;

    if args.json {
        return Ok(());
    }

    println!("\n{}", "═".repeat(80));

    if dashboard.has_active_blocker() && args.fail_on_blockers {
        println!("\n{}", "⚠️  BLOCKER: active blocker bugs are still open.");
        println!("{}", "    Resolve and close them before shipping.");
        std::process::exit(1);
    }
    Ok(())
}

fn run_mine(config: &Config, args: &MineArgs) -> Result<()> {
    let source = config.open_source()?;
    let bugs = source.list_bugs().context("Could not load bugs")?;

    let sort = SortState::from_clicks(&args.sort);
    let mine = reporter_view(&bugs, &args.reporter, &sort);
    report::print_reporter_view(&args.reporter, &mine, &sort, args.json)
}

fn run_submit(config: &Config, args: &SubmitArgs) -> Result<()> {
    let source = config.open_source()?;
    let saved = source.submit(NewBug {
        title: args.title.clone(),
        description: args.description.clone(),
        reporter: args.reporter.clone(),
        severity: args.severity,
        affected_file: args.affected_file.clone(),
    })?;
    report::print_submitted(&saved);
    Ok(())
}

fn print_applied(applied: &Applied) {
    println!(
        "{} {}: {} → {}",
        "✅".green(),
        applied.record.title.bold(),
        applied.previous,
        applied.record.status.to_string().cyan()
    );
}
