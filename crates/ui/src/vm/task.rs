use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::views::ViewError;

/// Runs `work` until it finishes or `cancel` fires, whichever comes first.
///
/// Work abandoned on cancellation is dropped, which aborts its in-flight request.
pub(crate) async fn until_cancelled<F, T>(cancel: &CancellationToken, work: F) -> Result<T, ViewError>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            tracing::debug!("view work cancelled");
            Err(ViewError::Cancelled)
        }
        output = work => Ok(output),
    }
}
