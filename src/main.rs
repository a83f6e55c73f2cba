use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::Context;

use tokio::io::{AsyncBufReadExt, BufReader};

use contact_form::form::{FormController, SubmissionStatus};
use contact_form::settings::Settings;
use contact_form::telemetry;
use contact_form::terminal;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let subscriber = telemetry::create_subscriber(telemetry::DEFAULT_ENV_FILTER, std::io::stderr);
    telemetry::set_subscriber(subscriber)?;

    let settings = Settings::load().context("Failed to load settings")?;
    let relay = settings.relay.client()?;

    let mut controller = FormController::new(settings.form.variant);
    // Render the submit control and banner whenever the status moves
    let last_status = Mutex::new(SubmissionStatus::Idle);
    controller.subscribe(move |state| {
        if let Ok(mut last) = last_status.lock() {
            if *last != *state.status() {
                *last = state.status().clone();
                println!("{}", terminal::render_status(state));
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    let outcome = terminal::run(
        &mut lines,
        &mut stdout,
        &mut controller,
        &relay,
        settings.form.sent_banner(),
        || chrono::Local::now().date_naive(),
    )
    .await?;

    tracing::info!(?outcome, "Contact form session finished");

    Ok(outcome.into())
}
