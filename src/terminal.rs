use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;

use chrono::NaiveDate;

use tokio::io::{AsyncBufRead, Lines};

use crate::client::MessageRelay;
use crate::domain::{
    countries_matching, is_listed_country, latest_eligible_birth_date, COUNTRIES,
};
use crate::form::{Action, Field, FieldView, FormController, FormState, SubmissionStatus};

/// How an interactive session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Sent,
    Abandoned,
}

/// A session that ends without sending exits unsuccessfully
impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Sent => ExitCode::SUCCESS,
            Outcome::Abandoned => ExitCode::FAILURE,
        }
    }
}

/// One line per field, with its error underneath when it has one
pub fn render_field(view: &FieldView<'_>) -> String {
    match view.error {
        Some(error) => format!("{}: {}\n  ! {}", view.field.label(), view.value, error),
        None => format!("{}: {}", view.field.label(), view.value),
    }
}

/// The submit control and banner
pub fn render_status(state: &FormState) -> String {
    let banner = match state.status() {
        SubmissionStatus::Sent => state.banner().map(|b| format!("✅ {}", b)),
        SubmissionStatus::Failed(_) => state.banner().map(|b| format!("❌ {}", b)),
        SubmissionStatus::Idle | SubmissionStatus::Submitting => None,
    };

    match banner {
        Some(banner) => format!("[{}] {}", state.submit_label(), banner),
        None => format!("[{}]", state.submit_label()),
    }
}

pub fn render(state: &FormState) -> String {
    let mut lines: Vec<_> = state.fields().map(|view| render_field(&view)).collect();
    lines.push(render_status(state));
    lines.join("\n")
}

/// Prompt for the form, submit it, and re-prompt until it is sent or given up.
///
/// After a validation failure only the failing fields are asked for again.
/// After a delivery failure the kept values can be resent as they are.
pub async fn run<R, W, M, T>(
    lines: &mut Lines<R>,
    out: &mut W,
    controller: &mut FormController,
    relay: &M,
    sent_banner: Option<Duration>,
    today: T,
) -> anyhow::Result<Outcome>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    M: MessageRelay + ?Sized,
    T: Fn() -> NaiveDate,
{
    let mut pending: Vec<Field> = controller.state().variant().fields().to_vec();

    loop {
        for field in pending.drain(..) {
            match prompt(lines, out, field, today()).await? {
                Some(value) => controller.edit(field, value),
                None => return Ok(Outcome::Abandoned),
            }
        }

        match controller.submit(relay, today()).await.clone() {
            SubmissionStatus::Sent => {
                if let Some(duration) = sent_banner {
                    tokio::time::sleep(duration).await;
                    controller.dispatch(Action::DismissBanner);
                }
                return Ok(Outcome::Sent);
            }
            SubmissionStatus::Failed(_) => {
                write!(out, "Send again? [y/N] ")?;
                out.flush()?;
                let answer = read_line(lines).await?.unwrap_or_default();
                if !answer.trim().eq_ignore_ascii_case("y") {
                    return Ok(Outcome::Abandoned);
                }
            }
            SubmissionStatus::Idle | SubmissionStatus::Submitting => {
                for (field, error) in controller.state().errors().iter() {
                    writeln!(out, "{}: {}", field.label(), error)?;
                }
                pending = controller.state().errors().fields().collect();
            }
        }
    }
}

async fn prompt<R, W>(
    lines: &mut Lines<R>,
    out: &mut W,
    field: Field,
    today: NaiveDate,
) -> anyhow::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        match field {
            Field::Country => write!(
                out,
                "{} (? to list, or the start of a name): ",
                field.label()
            )?,
            Field::Dob => write!(
                out,
                "{} (YYYY-MM-DD, on or before {}): ",
                field.label(),
                latest_eligible_birth_date(today)
            )?,
            _ => write!(out, "{}: ", field.label())?,
        }
        out.flush()?;

        let Some(value) = read_line(lines).await? else {
            return Ok(None);
        };

        if field != Field::Country || value.trim().is_empty() || is_listed_country(&value) {
            return Ok(Some(value.trim().to_string()));
        }

        if value.trim() == "?" {
            writeln!(out, "{}", COUNTRIES.join(", "))?;
            continue;
        }

        let matches: Vec<_> = countries_matching(&value).collect();
        match matches.as_slice() {
            [] => writeln!(out, "No country matches \"{}\"", value.trim())?,
            [only] => return Ok(Some(only.to_string())),
            many => writeln!(out, "Did you mean: {}", many.join(", "))?,
        }
    }
}

async fn read_line<R>(lines: &mut Lines<R>) -> anyhow::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    lines.next_line().await.context("Failed to read input")
}
