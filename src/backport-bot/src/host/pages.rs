//! Lazy pagination over closed pull requests.

use super::{HostError, PullRequest, RepositoryHost};
use futures::stream::{self, Stream, TryStreamExt};

/// Streams every closed pull request, fetching one page at a time.
///
/// A page is requested only once the previous one has been consumed, so
/// stopping early (e.g. with `StreamExt::take`) avoids further API calls.
pub fn closed_pulls(
    host: &dyn RepositoryHost,
    per_page: u8,
) -> impl Stream<Item = Result<PullRequest, HostError>> + Send + '_ {
    stream::try_unfold(Some(1u32), move |page| async move {
        let Some(page) = page else {
            return Ok::<_, HostError>(None);
        };
        let result = host.list_closed_pulls(page, per_page).await?;
        let items = stream::iter(result.items.into_iter().map(Ok));
        Ok(Some((items, result.next_page)))
    })
    .try_flatten()
}
