//! Resolves the identity at start-up and follows identity changes afterwards.

use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    background_task::BackgroundTask,
    identity::{BoundIdentity, IdentityProvider, IdentityState},
};

/// The application's view of the bound identity.
///
/// The binding starts out [IdentityState::Pending] and becomes
/// [IdentityState::Ready] once sign-in resolves, whether it succeeded or fell
/// back to a detached identity. It then rebinds whenever the provider reports
/// a change.
#[derive(Debug, Clone)]
pub struct IdentityBinding {
    state: Arc<watch::Sender<IdentityState>>,
    _task: Option<BackgroundTask>,
}

impl IdentityBinding {
    /// Start signing in with `provider` in the background.
    ///
    /// If `bootstrap_token` is set it is exchanged for an identity first, with
    /// anonymous sign-in as the fallback. If anonymous sign-in fails too, the
    /// binding uses a random, detached identity.
    pub fn spawn(provider: Arc<dyn IdentityProvider>, bootstrap_token: Option<String>) -> Self {
        let state = Arc::new(watch::Sender::new(IdentityState::Pending));
        let sender = state.clone();

        let task = BackgroundTask::spawn(async move {
            let identity = sign_in(provider.as_ref(), bootstrap_token.as_deref()).await;
            tracing::info!(
                "Identity ready, bound to {} ({:?})",
                identity.user_id,
                identity.backing
            );
            sender.send_replace(IdentityState::Ready(identity));

            follow_identity_changes(provider.as_ref(), &sender).await;
        });

        Self {
            state,
            _task: Some(task),
        }
    }

    /// A binding that is already resolved and never changes.
    #[cfg(test)]
    pub fn fixed(identity: BoundIdentity) -> Self {
        Self {
            state: Arc::new(watch::Sender::new(IdentityState::Ready(identity))),
            _task: None,
        }
    }

    /// A binding that never finishes signing in.
    #[cfg(test)]
    pub fn pending() -> Self {
        Self {
            state: Arc::new(watch::Sender::new(IdentityState::Pending)),
            _task: None,
        }
    }

    /// The current identity state.
    pub fn current(&self) -> IdentityState {
        self.state.borrow().clone()
    }

    /// A receiver that is notified every time the identity state changes.
    pub fn subscribe(&self) -> watch::Receiver<IdentityState> {
        self.state.subscribe()
    }
}

async fn sign_in(provider: &dyn IdentityProvider, bootstrap_token: Option<&str>) -> BoundIdentity {
    if let Some(token) = bootstrap_token {
        match provider.sign_in_with_custom_token(token).await {
            Ok(user_id) => return BoundIdentity::backed(user_id),
            Err(error) => {
                tracing::error!("Error signing in with custom token: {error}");
            }
        }
    }

    match provider.sign_in_anonymously().await {
        Ok(user_id) => BoundIdentity::backed(user_id),
        Err(error) => {
            tracing::error!("Error signing in anonymously: {error}");
            BoundIdentity::detached()
        }
    }
}

async fn follow_identity_changes(
    provider: &dyn IdentityProvider,
    sender: &watch::Sender<IdentityState>,
) {
    let mut changes = provider.changes();
    // The current value is the result of signing in, which is already bound.
    changes.borrow_and_update();

    while changes.changed().await.is_ok() {
        let identity = match changes.borrow_and_update().clone() {
            Some(user_id) => BoundIdentity::backed(user_id),
            None => BoundIdentity::detached(),
        };

        tracing::info!(
            "Identity changed, rebinding to {} ({:?})",
            identity.user_id,
            identity.backing
        );
        sender.send_replace(IdentityState::Ready(identity));
    }

    tracing::debug!("Identity provider closed its change stream");
}
