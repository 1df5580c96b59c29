//! Run a subcommand once or on a schedule, and print its report

use crate::cli::context::CommandContext;
use crate::cli::style::{CHECK, Stylize, link, spinner_style};
use crate::cli::NotificationArgs;
use anstream::println;
use bumpgate::error::Result;
use bumpgate::report::RunReport;
use bumpgate::run::{Operation, run};
use bumpgate::schedule::RunSchedule;
use bumpgate::types::OperationResult;
use chrono::{Local, Utc};
use indicatif::ProgressBar;
use std::time::Duration;
use tracing::{error, info};

/// Run `operation` with `args`
///
/// Without a schedule this runs once and returns its error, if any. With a
/// schedule, failed runs are logged and the next occurrence still runs,
/// unless the operator interrupted the run.
pub async fn run_command(
    operation: Operation,
    args: &NotificationArgs,
    api_url: Option<&str>,
) -> Result<()> {
    let schedule = args
        .schedule
        .as_deref()
        .map(RunSchedule::parse)
        .transpose()?;
    let filter = args.filter()?;
    let command = CommandContext::new(api_url)?;

    loop {
        let ctx = command.decision_context(args.interactive);
        let query = args.query(Utc::now())?;

        match run(&ctx, operation, &query, &filter).await {
            Ok(report) => print_report(operation, &report),
            Err(e) if schedule.is_some() && !e.is_run_fatal() => {
                error!(error = %e, "scheduled run failed");
            }
            Err(e) => return Err(e),
        }

        let Some(schedule) = &schedule else {
            return Ok(());
        };
        let Some(wait) = schedule.wait_from(Utc::now()) else {
            info!(schedule = schedule.expression(), "schedule has no further runs");
            return Ok(());
        };
        info!(
            schedule = schedule.expression(),
            wait_secs = wait.as_secs(),
            "waiting for next scheduled run"
        );
        wait_for_next_run(schedule, wait).await;
    }
}

async fn wait_for_next_run(schedule: &RunSchedule, wait: Duration) {
    let next = schedule
        .next_after(Utc::now())
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!(
        "Waiting for next run at {} ({})",
        next.emphasis(),
        schedule.expression().muted()
    ));
    spinner.enable_steady_tick(Duration::from_millis(80));

    tokio::time::sleep(wait).await;

    spinner.finish_and_clear();
}

/// Print run summary and the unresolved list
fn print_report(operation: Operation, report: &RunReport) {
    println!();
    if report.is_empty() {
        println!("{}", "No matching notifications.".muted());
        return;
    }

    println!(
        "{} {} {}",
        CHECK.success(),
        operation.emphasis(),
        format!(
            "done: {}, already done: {}, skipped: {}, errored: {}",
            report.count(OperationResult::Done),
            report.count(OperationResult::AlreadyDone),
            report.count(OperationResult::Skipped),
            report.count(OperationResult::Errored),
        )
        .muted()
    );

    let unresolved = report.unresolved();
    if unresolved.is_empty() {
        return;
    }
    println!();
    println!("{}", "Unresolved notifications:".warn());
    for item in unresolved {
        println!("  {}", item.title.accent());
        println!("    {}", link(item.url, item.url));
    }
}
