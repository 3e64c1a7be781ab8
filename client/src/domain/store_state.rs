//! Observable state shared by the auth, land, and transfer stores.
//!
//! Each store keeps its data behind a `tokio::sync::watch` channel. Readers
//! take cheap snapshots or subscribe to be woken on every change; writers go
//! through [`StateCell::track`] so `loading` and `error` follow one protocol:
//! set `loading` and clear `error`, run the remote call, then apply the
//! result or record the failure, and always clear `loading`.

use std::future::Future;

use tokio::sync::watch;

use super::Error;

/// Snapshot of a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState<T> {
    /// Cached records (or the session user for the auth store).
    pub data: T,
    /// Whether a mutating call is in flight.
    pub loading: bool,
    /// Message from the last failed call, cleared when the next call starts.
    pub error: Option<String>,
}

pub(crate) struct StateCell<T> {
    tx: watch::Sender<StoreState<T>>,
}

impl<T> StateCell<T>
where
    T: Clone + Default,
{
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(StoreState::default());
        Self { tx }
    }

    pub(crate) fn snapshot(&self) -> StoreState<T> {
        self.tx.borrow().clone()
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow().data)
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<StoreState<T>> {
        self.tx.subscribe()
    }

    pub(crate) fn record_error(&self, message: &str) {
        self.tx.send_modify(|state| state.error = Some(message.to_owned()));
    }

    pub(crate) fn clear_error(&self) {
        self.tx.send_if_modified(|state| state.error.take().is_some());
    }

    /// Run one remote call under the loading/error protocol. `apply` sees the
    /// successful value before it is handed back to the caller.
    pub(crate) async fn track<R, E, Fut>(
        &self,
        call: Fut,
        apply: impl FnOnce(&mut T, &R),
    ) -> Result<R, Error>
    where
        Fut: Future<Output = Result<R, E>>,
        E: Into<Error>,
    {
        self.tx.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        match call.await {
            Ok(value) => {
                self.tx.send_modify(|state| {
                    apply(&mut state.data, &value);
                    state.loading = false;
                });
                Ok(value)
            }
            Err(err) => {
                let err = err.into();
                self.tx.send_modify(|state| {
                    state.error = Some(err.message().to_owned());
                    state.loading = false;
                });
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn success_applies_result_and_clears_loading() {
        let cell = StateCell::<Vec<u32>>::new();
        cell.record_error("stale");

        let value = cell
            .track(async { Ok::<_, Error>(5_u32) }, |data, value| {
                data.insert(0, *value);
            })
            .await
            .expect("call succeeds");

        assert_eq!(value, 5);
        assert_eq!(
            cell.snapshot(),
            StoreState {
                data: vec![5],
                loading: false,
                error: None,
            }
        );
    }

    #[tokio::test]
    async fn failure_records_message_and_leaves_data() {
        let cell = StateCell::<Vec<u32>>::new();
        let err = cell
            .track(
                async { Err::<u32, _>(Error::service_unavailable("Network timeout")) },
                |data, value| data.push(*value),
            )
            .await
            .expect_err("call fails");

        assert_eq!(err.message(), "Network timeout");
        let state = cell.snapshot();
        assert!(state.data.is_empty());
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Network timeout"));
    }

    #[tokio::test]
    async fn loading_is_visible_while_the_call_is_pending() {
        let cell = StateCell::<Vec<u32>>::new();
        let mut rx = cell.subscribe();
        let (release, gate) = tokio::sync::oneshot::channel::<()>();

        let call = cell.track(
            async move {
                gate.await.map_err(|_| Error::internal("gate dropped"))?;
                Ok::<_, Error>(1_u32)
            },
            |data, value| data.push(*value),
        );
        let observer = async {
            rx.changed().await.expect("state changes");
            let loading = rx.borrow_and_update().loading;
            release.send(()).expect("release call");
            loading
        };

        let (result, saw_loading) = tokio::join!(call, observer);
        assert!(saw_loading);
        assert_eq!(result.expect("call succeeds"), 1);
        assert!(!cell.snapshot().loading);
    }

    #[test]
    fn clear_error_only_notifies_when_something_changed() {
        let cell = StateCell::<Vec<u32>>::new();
        let rx = cell.subscribe();
        cell.clear_error();
        assert!(!rx.has_changed().expect("sender alive"));

        cell.record_error("boom");
        cell.clear_error();
        assert!(cell.snapshot().error.is_none());
    }
}
