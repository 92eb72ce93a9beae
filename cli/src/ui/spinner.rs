use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::io::IsTerminal;
use std::time::{Duration, Instant};
use tracing::debug;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Awaits `fut` behind a spinner labelled `msg`.
///
/// The spinner only draws when stderr is a terminal, so scripted runs and
/// tests see no output. The line is cleared however the future finishes,
/// including when it is dropped mid-flight.
pub async fn with_spinner<Fut, T, E>(msg: impl Into<String>, fut: Fut) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    let msg = msg.into();
    let _line = SpinnerLine::start(&msg);

    let result = fut.await;
    debug!(task = %msg, ok = result.is_ok(), "spinner task finished");
    result
}

struct SpinnerLine {
    bar: Option<ProgressBar>,
    started: Instant,
}

impl SpinnerLine {
    fn start(msg: &str) -> Self {
        let bar = std::io::stderr().is_terminal().then(|| {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg} {elapsed:.dim}") {
                bar.set_style(style.tick_chars(TICK_CHARS));
            }
            bar.set_message(msg.to_string());
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });

        Self {
            bar,
            started: Instant::now(),
        }
    }
}

impl Drop for SpinnerLine {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        debug!(elapsed = ?self.started.elapsed(), "spinner cleared");
    }
}
