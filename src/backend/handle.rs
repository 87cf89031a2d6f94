use super::traits::{BackendLoader, TextBackend};
use crate::config::SamplingConfig;
use crate::error::BackendError;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

/// Process-wide backend lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendState {
    Unloaded,
    Loading,
    Ready,
    /// Terminal: initialization failed and is not retried by this component.
    Failed,
}

/// Milestone reported during backend initialization.
#[derive(Debug, Clone, Serialize)]
pub struct LoadProgress {
    /// Approximate completion, 0..=100.
    pub percent: u8,
    pub loaded: u64,
    pub total: u64,
    pub status: LoadStatus,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Probing,
    Downloading,
    Initializing,
    Ready,
}

/// Observer callback for load progress; purely observational.
pub type ProgressObserver = Arc<dyn Fn(&LoadProgress) + Send + Sync>;

enum Slot {
    Unloaded,
    Loading,
    Ready(Arc<dyn TextBackend>),
    Failed(String),
}

/// Shared handle around one-time asynchronous backend initialization.
///
/// Exactly one load may be in flight. The first caller flips
/// `Unloaded -> Loading` and runs the load; concurrent callers park on a
/// watch channel until the transition settles and then observe the same
/// handle or the same error. Once `Ready`, [`BackendHandle::acquire`] returns
/// the cached handle for the lifetime of the process.
pub struct BackendHandle {
    loader: Box<dyn BackendLoader>,
    sampling: SamplingConfig,
    slot: Mutex<Slot>,
    state_tx: watch::Sender<BackendState>,
}

impl BackendHandle {
    pub fn new(loader: Box<dyn BackendLoader>, sampling: SamplingConfig) -> Self {
        let (state_tx, _) = watch::channel(BackendState::Unloaded);
        Self {
            loader,
            sampling,
            slot: Mutex::new(Slot::Unloaded),
            state_tx,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BackendState {
        *self.state_tx.borrow()
    }

    /// Probe execution pathways without triggering a load. Lets the outer
    /// layer decide whether generation is worth attempting at all.
    pub fn capabilities(&self) -> super::device::DeviceCaps {
        self.loader.probe()
    }

    /// Obtain the loaded backend, initializing it on first use.
    ///
    /// Only the caller that triggers the load receives intermediate progress
    /// milestones; late joiners resolve once the load settles.
    pub async fn acquire(
        &self,
        observer: Option<&ProgressObserver>,
    ) -> Result<Arc<dyn TextBackend>, BackendError> {
        loop {
            // Subscribe before inspecting the slot so a transition between
            // the two cannot be missed.
            let mut rx = self.state_tx.subscribe();
            {
                let mut slot = self.slot.lock().await;
                match &*slot {
                    Slot::Ready(backend) => return Ok(Arc::clone(backend)),
                    Slot::Failed(cause) => {
                        return Err(BackendError::Unavailable(cause.clone()));
                    }
                    Slot::Loading => {}
                    Slot::Unloaded => {
                        *slot = Slot::Loading;
                        self.state_tx.send_replace(BackendState::Loading);
                        drop(slot);
                        return self.run_load(observer).await;
                    }
                }
            }
            // Another caller owns the load; wait for the state to settle.
            while *rx.borrow_and_update() == BackendState::Loading {
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
    }

    /// Run one completion against the loaded backend and normalize its raw
    /// output to plain text.
    ///
    /// Malformed output never errors here; transport and initialization
    /// failures do.
    pub async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, BackendError> {
        let backend = self.acquire(None).await?;
        let raw = backend
            .generate(prompt, max_tokens, &self.sampling)
            .await
            .map_err(|e| BackendError::Generation(e.to_string()))?;
        Ok(raw.normalize())
    }

    async fn run_load(
        &self,
        observer: Option<&ProgressObserver>,
    ) -> Result<Arc<dyn TextBackend>, BackendError> {
        let caps = self.loader.probe();
        tracing::info!(
            supported = caps.supported,
            accelerated = caps.accelerated,
            portable = caps.portable,
            "probed execution devices"
        );

        let result = match caps.recommended {
            Some(device) => self.loader.load(device, observer).await,
            None => Err(anyhow::anyhow!("no supported execution device")),
        };

        let mut slot = self.slot.lock().await;
        match result {
            Ok(backend) => {
                if let Some(observe) = observer {
                    observe(&LoadProgress {
                        percent: 100,
                        loaded: 0,
                        total: 0,
                        status: LoadStatus::Ready,
                        file: None,
                    });
                }
                tracing::info!(backend = backend.name(), "backend ready");
                *slot = Slot::Ready(Arc::clone(&backend));
                self.state_tx.send_replace(BackendState::Ready);
                Ok(backend)
            }
            Err(e) => {
                let cause = e.to_string();
                tracing::warn!(error = %cause, "backend initialization failed");
                *slot = Slot::Failed(cause.clone());
                self.state_tx.send_replace(BackendState::Failed);
                Err(BackendError::Unavailable(cause))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::device::{Device, DeviceCaps};
    use crate::backend::response::RawResponse;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct EchoBackend;

    impl TextBackend for EchoBackend {
        fn name(&self) -> &str {
            "echo"
        }

        fn generate<'a>(
            &'a self,
            prompt: &'a str,
            _max_tokens: u32,
            _sampling: &'a SamplingConfig,
        ) -> Pin<Box<dyn Future<Output = anyhow::Result<RawResponse>> + Send + 'a>> {
            Box::pin(async move { Ok(RawResponse::Text(prompt.to_string())) })
        }
    }

    struct SlowLoader {
        loads: Arc<AtomicUsize>,
        delay: Duration,
        fail: bool,
    }

    impl BackendLoader for SlowLoader {
        fn probe(&self) -> DeviceCaps {
            DeviceCaps::detect_from(false, true)
        }

        fn load<'a>(
            &'a self,
            _device: Device,
            observer: Option<&'a ProgressObserver>,
        ) -> Pin<Box<dyn Future<Output = anyhow::Result<Arc<dyn TextBackend>>> + Send + 'a>>
        {
            Box::pin(async move {
                self.loads.fetch_add(1, Ordering::SeqCst);
                if let Some(observe) = observer {
                    observe(&LoadProgress {
                        percent: 10,
                        loaded: 1,
                        total: 10,
                        status: LoadStatus::Downloading,
                        file: Some("weights.bin".into()),
                    });
                }
                tokio::time::sleep(self.delay).await;
                if self.fail {
                    anyhow::bail!("load error");
                }
                Ok(Arc::new(EchoBackend) as Arc<dyn TextBackend>)
            })
        }
    }

    fn handle(loads: &Arc<AtomicUsize>, fail: bool) -> Arc<BackendHandle> {
        Arc::new(BackendHandle::new(
            Box::new(SlowLoader {
                loads: Arc::clone(loads),
                delay: Duration::from_millis(20),
                fail,
            }),
            SamplingConfig::default(),
        ))
    }

    #[tokio::test]
    async fn concurrent_acquire_triggers_one_load() {
        let loads = Arc::new(AtomicUsize::new(0));
        let handle = handle(&loads, false);

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let handle = Arc::clone(&handle);
            tasks.push(tokio::spawn(async move { handle.acquire(None).await }));
        }
        for task in tasks {
            let backend = task.await.unwrap().unwrap();
            assert_eq!(backend.name(), "echo");
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(handle.state(), BackendState::Ready);
    }

    #[tokio::test]
    async fn all_waiters_observe_the_same_failure() {
        let loads = Arc::new(AtomicUsize::new(0));
        let handle = handle(&loads, true);

        let mut tasks = Vec::new();
        for _ in 0..4 {
            let handle = Arc::clone(&handle);
            tasks.push(tokio::spawn(async move { handle.acquire(None).await }));
        }
        for task in tasks {
            let err = task.await.unwrap().unwrap_err();
            assert!(matches!(err, BackendError::Unavailable(_)));
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(handle.state(), BackendState::Failed);

        // Failed is terminal: no re-initialization on later acquires.
        assert!(handle.acquire(None).await.is_err());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn ready_acquire_returns_cached_handle() {
        let loads = Arc::new(AtomicUsize::new(0));
        let handle = handle(&loads, false);

        handle.acquire(None).await.unwrap();
        handle.acquire(None).await.unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn loading_caller_receives_progress_and_final_ready() {
        let loads = Arc::new(AtomicUsize::new(0));
        let handle = handle(&loads, false);

        let seen: Arc<std::sync::Mutex<Vec<(u8, LoadStatus)>>> =
            Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer: ProgressObserver = Arc::new(move |p: &LoadProgress| {
            sink.lock().unwrap().push((p.percent, p.status));
        });

        handle.acquire(Some(&observer)).await.unwrap();
        let events = seen.lock().unwrap();
        assert_eq!(events.first(), Some(&(10, LoadStatus::Downloading)));
        assert_eq!(events.last(), Some(&(100, LoadStatus::Ready)));
    }

    #[tokio::test]
    async fn unsupported_device_fails_without_loading() {
        struct NoDeviceLoader;
        impl BackendLoader for NoDeviceLoader {
            fn probe(&self) -> DeviceCaps {
                DeviceCaps::unsupported()
            }
            fn load<'a>(
                &'a self,
                _device: Device,
                _observer: Option<&'a ProgressObserver>,
            ) -> Pin<Box<dyn Future<Output = anyhow::Result<Arc<dyn TextBackend>>> + Send + 'a>>
            {
                Box::pin(async move { unreachable!("load must not run without a device") })
            }
        }

        let handle = BackendHandle::new(Box::new(NoDeviceLoader), SamplingConfig::default());
        let err = handle.acquire(None).await.unwrap_err();
        assert!(err.to_string().contains("no supported execution device"));
    }

    #[tokio::test]
    async fn generate_normalizes_backend_output() {
        let loads = Arc::new(AtomicUsize::new(0));
        let handle = handle(&loads, false);
        let text = handle.generate("hello", 16).await.unwrap();
        assert_eq!(text, "hello");
    }
}
