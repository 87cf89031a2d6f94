use super::device::{Device, DeviceCaps};
use super::handle::ProgressObserver;
use super::traits::{BackendLoader, TextBackend};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Loader for hosts with no model runtime wired in.
///
/// Probes no devices and never loads, which routes every generation request
/// through the deterministic fallback path. Used by the demo binary and as a
/// hard-failure double in tests.
pub struct OfflineLoader;

impl BackendLoader for OfflineLoader {
    fn probe(&self) -> DeviceCaps {
        DeviceCaps::unsupported()
    }

    fn load<'a>(
        &'a self,
        _device: Device,
        _observer: Option<&'a ProgressObserver>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Arc<dyn TextBackend>>> + Send + 'a>> {
        Box::pin(async move { anyhow::bail!("no local model runtime is wired in") })
    }
}
