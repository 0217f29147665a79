use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rocket::futures::future::BoxFuture;
use rocket::futures::FutureExt;
use tracing_futures::Instrument;

/// Error message used when a failed load doesn't describe itself.
pub static LOAD_FAILED_MESSAGE: &str = "Failed to load data";

type Producer<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<Option<Vec<T>>, String>> + Send + Sync>;

struct LoaderState<T> {
    data: Vec<T>,
    loading: bool,
    error: Option<String>,
    revision: u64,
}

struct Shared<T> {
    state: Mutex<LoaderState<T>>,
    mounted: AtomicBool,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, LoaderState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadSnapshot<T> {
    pub data: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Holds a collection produced by an async function along with its loading
/// and error state.
///
/// Results arriving after [`CollectionLoader::unmount`] are dropped. Reloads
/// are neither deduplicated nor cancelled: when two overlap, whichever
/// finishes last wins.
pub struct CollectionLoader<T> {
    shared: Arc<Shared<T>>,
    producer: Producer<T>,
}

impl<T> Clone for CollectionLoader<T> {
    fn clone(&self) -> Self {
        CollectionLoader {
            shared: self.shared.clone(),
            producer: self.producer.clone(),
        }
    }
}

impl<T> std::fmt::Debug for CollectionLoader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("CollectionLoader")
            .field("len", &state.data.len())
            .field("loading", &state.loading)
            .field("error", &state.error)
            .field("revision", &state.revision)
            .field("mounted", &self.shared.is_mounted())
            .finish()
    }
}

impl<T: Send + 'static> CollectionLoader<T> {
    /// Mounts the loader and waits for the initial load. `producer` runs
    /// once here and once per [`reload`](Self::reload).
    pub async fn mount<F, Fut, E>(producer: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Vec<T>>, E>> + Send + 'static,
        E: Display + 'static,
    {
        let producer: Producer<T> = Arc::new(move || {
            let pending = producer();
            async move {
                pending.await.map_err(|err| {
                    let message = err.to_string();
                    if message.trim().is_empty() {
                        LOAD_FAILED_MESSAGE.to_string()
                    } else {
                        message
                    }
                })
            }
            .boxed()
        });

        let loader = CollectionLoader {
            shared: Arc::new(Shared {
                state: Mutex::new(LoaderState {
                    data: Vec::new(),
                    loading: true,
                    error: None,
                    revision: 0,
                }),
                mounted: AtomicBool::new(true),
            }),
            producer,
        };
        loader.reload().await;
        loader
    }

    /// Runs the producer again. The returned future owns everything it
    /// needs, so it can be spawned.
    pub fn reload(&self) -> impl Future<Output = ()> + Send + 'static {
        let shared = self.shared.clone();
        let producer = self.producer.clone();

        async move {
            if !shared.is_mounted() {
                return;
            }
            {
                let mut state = shared.lock();
                state.loading = true;
                state.error = None;
            }

            let result = producer().await;

            if !shared.is_mounted() {
                tracing::debug!("discarding collection load finished after unmount");
                return;
            }

            let mut state = shared.lock();
            match result {
                Ok(data) => {
                    state.data = data.unwrap_or_default();
                    tracing::debug!("loaded {} rows", state.data.len());
                }
                Err(message) => {
                    tracing::warn!("collection load failed: {}", message);
                    state.error = Some(message);
                    state.data = Vec::new();
                }
            }
            state.revision += 1;
            state.loading = false;
        }
        .instrument(tracing::debug_span!("collection_load"))
    }

    /// Stops applying results of loads still in flight.
    pub fn unmount(&self) {
        self.shared.mounted.store(false, Ordering::Release);
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.is_mounted()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.shared.lock().error.clone()
    }

    /// Bumped every time the data is replaced or edited.
    pub fn revision(&self) -> u64 {
        self.shared.lock().revision
    }

    pub fn with_data<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.shared.lock().data)
    }

    /// Edits the loaded rows in place, e.g. to reflect a save without
    /// reloading.
    pub fn set_data(&self, f: impl FnOnce(&mut Vec<T>)) {
        let mut state = self.shared.lock();
        f(&mut state.data);
        state.revision += 1;
    }
}

impl<T: Clone + Send + 'static> CollectionLoader<T> {
    pub fn data(&self) -> Vec<T> {
        self.shared.lock().data.clone()
    }

    pub fn snapshot(&self) -> LoadSnapshot<T> {
        let state = self.shared.lock();
        LoadSnapshot {
            data: state.data.clone(),
            loading: state.loading,
            error: state.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    fn counting(
        calls: Arc<AtomicUsize>,
    ) -> impl Fn() -> BoxFuture<'static, Result<Option<Vec<usize>>, String>> + Send + Sync {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok(Some(vec![n])) }.boxed()
        }
    }

    /// Producer whose `n`th call waits for `gate` before answering.
    fn gated(
        calls: Arc<AtomicUsize>,
        gate: Arc<Notify>,
        slow_call: usize,
    ) -> impl Fn() -> BoxFuture<'static, Result<Option<Vec<usize>>, String>> + Send + Sync {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            let gate = gate.clone();
            async move {
                if n == slow_call {
                    gate.notified().await;
                }
                Ok(Some(vec![n]))
            }
            .boxed()
        }
    }

    async fn wait_for_calls(calls: &AtomicUsize, n: usize) {
        while calls.load(Ordering::SeqCst) < n {
            tokio::task::yield_now().await;
        }
    }

    #[rocket::async_test]
    async fn mount_loads_once_and_reload_loads_again() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = CollectionLoader::mount(counting(calls.clone())).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            loader.snapshot(),
            LoadSnapshot {
                data: vec![1],
                loading: false,
                error: None
            }
        );

        loader.reload().await;
        loader.reload().await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(loader.data(), vec![3]);
    }

    #[rocket::async_test]
    async fn missing_result_loads_as_empty() {
        let loader = CollectionLoader::<u32>::mount(|| async { Ok::<_, String>(None) }).await;
        assert!(loader.data().is_empty());
        assert_eq!(loader.error(), None);
    }

    #[rocket::async_test]
    async fn failure_sets_error_and_clears_data() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let loader = CollectionLoader::mount(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Ok(Some(vec!["row"]))
                } else {
                    Err("record store unavailable".to_string())
                }
            }
        })
        .await;
        assert_eq!(loader.data(), vec!["row"]);

        loader.reload().await;
        let snapshot = loader.snapshot();
        assert!(snapshot.data.is_empty());
        assert!(!snapshot.loading);
        assert_eq!(snapshot.error.as_deref(), Some("record store unavailable"));
    }

    #[rocket::async_test]
    async fn blank_failure_message_uses_fallback() {
        let loader =
            CollectionLoader::<u32>::mount(|| async { Err::<Option<Vec<u32>>, _>("  ") }).await;
        assert_eq!(loader.error().as_deref(), Some(LOAD_FAILED_MESSAGE));
    }

    #[rocket::async_test]
    async fn results_after_unmount_are_discarded() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());
        let loader = CollectionLoader::mount(gated(calls.clone(), gate.clone(), 2)).await;
        let revision = loader.revision();

        let pending = tokio::spawn(loader.reload());
        wait_for_calls(&calls, 2).await;
        loader.unmount();
        gate.notify_one();
        pending.await.expect("reload task panicked");

        assert_eq!(loader.data(), vec![1]);
        assert_eq!(loader.revision(), revision);
        assert!(!loader.is_mounted());

        loader.reload().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2, "unmounted loader must not load");
    }

    #[rocket::async_test]
    async fn overlapping_reloads_are_not_deduplicated() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());
        let loader = CollectionLoader::mount(gated(calls.clone(), gate.clone(), 2)).await;

        let slow = tokio::spawn(loader.reload());
        wait_for_calls(&calls, 2).await;

        loader.reload().await;
        assert_eq!(loader.data(), vec![3]);

        // the earlier reload finishes last and overwrites the newer result
        gate.notify_one();
        slow.await.expect("reload task panicked");
        assert_eq!(loader.data(), vec![2]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[rocket::async_test]
    async fn set_data_edits_rows_and_bumps_revision() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = CollectionLoader::mount(counting(calls.clone())).await;
        let revision = loader.revision();

        loader.set_data(|rows| rows.push(42));
        assert_eq!(loader.data(), vec![1, 42]);
        assert!(loader.revision() > revision);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
