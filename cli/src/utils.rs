//! Shared utility functions.

use std::future::Future;
use std::time::Duration;

/// Wraps a future with an optional timeout.
/// If `timeout` is `None`, the future runs without a timeout; on expiry the
/// error is built by `on_elapsed`.
pub async fn with_optional_timeout<F, T, E>(
    future: F,
    timeout: Option<Duration>,
    on_elapsed: impl FnOnce(Duration) -> E,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    match timeout {
        Some(duration) => tokio::time::timeout(duration, future)
            .await
            .map_err(|_| on_elapsed(duration))?,
        None => future.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn without_timeout_runs_to_completion() {
        let out: Result<u8, String> =
            with_optional_timeout(async { Ok(7) }, None, |d| format!("{d:?}")).await;
        assert_eq!(out, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_timeout_maps_the_error() {
        let out: Result<u8, String> = with_optional_timeout(
            async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(1)
            },
            Some(Duration::from_secs(1)),
            |d| format!("timed out after {}s", d.as_secs()),
        )
        .await;
        assert_eq!(out, Err("timed out after 1s".to_string()));
    }
}
