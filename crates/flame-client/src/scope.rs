use std::future::Future;

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Lifetime of a mounted view.
///
/// Every network future a view awaits goes through [`ViewScope::guard`];
/// once the view is torn down the future is dropped and its result never
/// reaches view state.
#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope that ends with this one but can also be torn down on its own.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    pub fn is_live(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn teardown(&self) {
        self.token.cancel();
    }

    pub fn torn_down(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// Run `fut` unless the scope ends first. `None` means the result was discarded.
    pub async fn guard<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            out = fut => self.is_live().then_some(out),
        }
    }
}
