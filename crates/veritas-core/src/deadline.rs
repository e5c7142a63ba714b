use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Result};

/// Awaits `fut`, failing once `deadline` elapses. `None` waits indefinitely.
pub async fn with_deadline<T, F>(deadline: Option<Duration>, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut).await.map_err(|_| anyhow!("deadline of {:?} exceeded", d))?,
        None => fut.await,
    }
}
