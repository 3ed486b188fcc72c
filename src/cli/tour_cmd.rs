use crate::error::Result;

/// Explicit "start tutorial" entry point: opens the dashboard with the tour
/// restarted from the first step, even for users who already completed it.
pub async fn run() -> Result<()> {
    crate::cli::dashboard::run(true).await
}
