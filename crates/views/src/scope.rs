use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Lifetime of one mounted view.
///
/// Requests issued through [`ViewScope::guard`] stop being awaited once the
/// scope closes, and their results are dropped. Dropping the scope closes it.
#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

/// Cloneable handle that can close a scope from elsewhere (a socket task,
/// a navigation event).
#[derive(Debug, Clone)]
pub struct ScopeHandle {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> ScopeHandle {
        ScopeHandle {
            token: self.token.clone(),
        }
    }

    pub fn close(&self) {
        self.token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token cancelled when this scope closes, or earlier if cancelled itself.
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Await `fut` unless the scope closes first. `None` means the view is gone.
    pub async fn guard<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            out = fut => (!self.token.is_cancelled()).then_some(out),
        }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl ScopeHandle {
    pub fn close(&self) {
        self.token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }
}
