//! Transaction scope for mutating use-cases

use std::future::Future;
use std::pin::Pin;

use tracing::warn;

use crate::domain::{DomainResult, RepositoryProvider, UnitOfWork};

/// Future returned by a transactional body, borrowing the unit of work.
pub type UowFuture<'a, T> = Pin<Box<dyn Future<Output = DomainResult<T>> + Send + 'a>>;

/// Run `body` inside a fresh unit of work.
///
/// Commits when the body returns `Ok` and rolls back when it returns `Err`;
/// the body's error is returned even if the rollback itself fails.
///
/// ```ignore
/// in_transaction(repos, move |uow| Box::pin(async move {
///     uow.users().save(user).await
/// }))
/// .await
/// ```
pub async fn in_transaction<T, F>(repos: &dyn RepositoryProvider, body: F) -> DomainResult<T>
where
    T: Send,
    F: for<'u> FnOnce(&'u dyn UnitOfWork) -> UowFuture<'u, T> + Send,
{
    let uow = repos.begin().await?;

    let result = body(uow.as_ref()).await;

    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = uow.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}
