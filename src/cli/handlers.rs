//! Command handlers: run the dispatcher, print the tally, pick the exit status.

use colored::*;
use log::info;

use volley::dispatch::Dispatcher;
use volley::domain::OutcomeStatus;
use volley::http::PostRequest;
use volley::summary::{BatchSummary, partition};

use super::commands::CommandStatus;

pub async fn run_once(dispatcher: &Dispatcher, request: &PostRequest, verbose: bool) -> CommandStatus {
    info!("Sending single request to {}", request.url);
    let outcome = dispatcher.dispatch_one(request).await;

    if verbose {
        println!("  attempts: {}, elapsed: {:?}", outcome.attempts, outcome.elapsed);
    }

    match &outcome.status {
        OutcomeStatus::Success { status, .. } => {
            info!("Single request succeeded with status {}", status);
            println!("{}", "Single request successful".green());
            CommandStatus::Success
        }
        OutcomeStatus::Failure(reason) => {
            info!("Single request failed: {}", reason);
            println!("{}", "Single request failed".yellow());
            if verbose {
                println!("  {}", reason);
            }
            CommandStatus::Invalid
        }
        OutcomeStatus::Cancelled => {
            println!("{}", "Single request failed".yellow());
            CommandStatus::Invalid
        }
    }
}

pub async fn run_multiple(
    dispatcher: &Dispatcher,
    request: &PostRequest,
    count: usize,
    verbose: bool,
) -> CommandStatus {
    info!("Sending {} requests to {}", count, request.url);
    let batch = dispatcher.dispatch(request, count).await;
    let summary = BatchSummary::from_batch(&batch);

    println!("{}", format!("Successful responses: {}", summary.successes).green());
    println!("{}", format!("Failed responses: {}", summary.failures).yellow());

    if verbose {
        println!(
            "  attempts: {}, cancelled: {}",
            summary.total_attempts, summary.cancelled
        );
        let (_, failures) = partition(&batch);
        for outcome in failures {
            match &outcome.status {
                OutcomeStatus::Failure(reason) => {
                    println!("  #{}: {} after {} attempt(s)", outcome.index, reason, outcome.attempts)
                }
                _ => println!("  #{}: cancelled", outcome.index),
            }
        }
    }

    info!(
        "Batch finished: {} succeeded, {} failed",
        summary.successes, summary.failures
    );

    if summary.is_any_success() {
        CommandStatus::Success
    } else {
        CommandStatus::Invalid
    }
}
