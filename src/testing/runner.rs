//! Suite runner
//!
//! Runs every scenario in order against one context, isolates faults per
//! scenario, then removes the fixtures the run created.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use colored::Colorize;
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use reqwest::Method;

use super::context::TestContext;
use super::report::{SuiteReport, Verdict};
use crate::common::Result;

use super::scenarios::{execute_scenario, Scenario};

/// Run the full suite, then clean up
pub async fn run_suite(ctx: &mut TestContext) -> SuiteReport {
    run_scenarios(ctx, &Scenario::ALL).await
}

/// Run the given scenarios in order, then clean up
pub async fn run_scenarios(ctx: &mut TestContext, scenarios: &[Scenario]) -> SuiteReport {
    run_steps(ctx, scenarios, |ctx, scenario| {
        execute_scenario(ctx, scenario).boxed_local()
    })
    .await
}

/// Run each scenario through `step`, then clean up
///
/// A step that errors or panics is recorded as failed and the run
/// continues with the next one.
pub async fn run_steps<F>(ctx: &mut TestContext, scenarios: &[Scenario], mut step: F) -> SuiteReport
where
    F: for<'a> FnMut(&'a mut TestContext, Scenario) -> LocalBoxFuture<'a, Result<Verdict>>,
{
    println!("{}", "🚀 Starting Cafe API Testing...".bold());
    println!("{}", "=".repeat(50));
    tracing::info!(base_url = ctx.base_url(), scenarios = scenarios.len(), "Starting run");

    let mut results = Vec::with_capacity(scenarios.len());
    for &scenario in scenarios {
        let outcome = AssertUnwindSafe(step(ctx, scenario)).catch_unwind().await;

        let verdict = match outcome {
            Ok(Ok(verdict)) => verdict,
            Ok(Err(e)) => {
                println!("{} Test failed with exception: {}", "❌".red(), e);
                Verdict::Failed(e.to_string())
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                println!("{} Test failed with exception: {}", "❌".red(), message);
                Verdict::Failed(message)
            }
        };
        tracing::debug!(scenario = scenario.name(), ?verdict, "Scenario finished");
        results.push((scenario.name(), verdict));
    }

    cleanup(ctx).await;

    SuiteReport {
        results,
        tally: ctx.tally,
        cleanup: ctx.cleanup_tally,
    }
}

/// Delete the order and product created during the run
///
/// Best effort: failures are printed and never stop the run.
pub async fn cleanup(ctx: &mut TestContext) {
    println!("\n🧹 Cleaning up test data...");
    ctx.enter_cleanup();

    if ctx.token().is_none() {
        tracing::debug!("No token, nothing can be deleted");
        return;
    }

    // Always recorded in the cleanup tally, whatever the scoring policy
    if let Some(order_id) = ctx.fixtures.order_id.clone() {
        let path = format!("api/orders/{}", order_id);
        let (success, _) = ctx
            .execute_unscored("Delete Test Order", Method::DELETE, &path, 200)
            .await;
        if success {
            ctx.fixtures.order_id = None;
        }
    }

    if let Some(product_id) = ctx.fixtures.product_id.clone() {
        let path = format!("api/products/{}", product_id);
        let (success, _) = ctx
            .execute_request("Delete Test Product", Method::DELETE, &path, 200, None, &[])
            .await;
        if success {
            ctx.fixtures.product_id = None;
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "scenario panicked".to_string()
    }
}
