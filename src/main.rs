use std::process;

use resolver_cache_key::{
    application::{calculator::build_calculator, error::AppError},
    config,
    infra::telemetry,
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    let messages = error.messages();
    if dispatcher::has_been_set() {
        error!(error = %error, chain = ?messages, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, chain = ?messages, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging)?;

    let calculator = build_calculator(&settings.factors);
    let budget = settings.calculator.provider_timeout();

    info!(
        target: "resolver_cache_key::cli",
        providers = calculator.registry().len(),
        budget_ms = budget.as_millis() as u64,
        parent_data = cli_args.parent_data.is_some(),
        "Calculating resolver cache key"
    );

    match calculator
        .calculate_cache_key_within(cli_args.parent_data.as_ref(), budget)
        .await
    {
        Some(key) => println!("{key}"),
        None => info!(
            target: "resolver_cache_key::cli",
            "No key factor applied; resolver results are not differentiated"
        ),
    }

    Ok(())
}
