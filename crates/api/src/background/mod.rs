//! Scheduled background jobs.

pub mod keep_alive;

use std::sync::Arc;

use stockroom_storage::BlobStore;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::info;

use crate::config::JobsConfig;

/// Storage keep-alive: daily at 03:00.
pub const STORAGE_KEEP_ALIVE_CRON: &str = "0 0 3 * * *";
/// Self-ping: every 14 minutes.
pub const SELF_PING_CRON: &str = "0 */14 * * * *";

/// Initialize and start the job scheduler.
///
/// The self-ping job is only registered when `BACKEND_URL` is configured.
pub async fn start_scheduler(
    storage: Arc<dyn BlobStore>,
    http: reqwest::Client,
    config: &JobsConfig,
) -> anyhow::Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let storage_job = Job::new_async(STORAGE_KEEP_ALIVE_CRON, move |_uuid, _l| {
        let storage = storage.clone();
        Box::pin(async move {
            info!("Running storage keep-alive");
            match keep_alive::ping_storage(storage.as_ref()).await {
                Ok(count) => info!(objects = count, "Storage keep-alive succeeded"),
                Err(e) => tracing::error!("Storage keep-alive error: {}", e),
            }
        })
    })?;
    scheduler.add(storage_job).await?;

    if let Some(url) = config.backend_url.clone() {
        let ping_job = Job::new_async(SELF_PING_CRON, move |_uuid, _l| {
            let http = http.clone();
            let url = url.clone();
            Box::pin(async move {
                match keep_alive::ping_backend(&http, &url).await {
                    Ok(body) => info!(%url, body = %body, "Self-ping succeeded"),
                    Err(e) => tracing::error!("Self-ping error: {}", e),
                }
            })
        })?;
        scheduler.add(ping_job).await?;
    } else {
        info!("BACKEND_URL not set, self-ping disabled");
    }

    scheduler.start().await?;

    info!("Job scheduler started");
    Ok(scheduler)
}
