use super::device::{Device, DeviceCaps};
use super::handle::ProgressObserver;
use super::response::RawResponse;
use crate::config::SamplingConfig;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A loaded text-generation backend.
///
/// Treated as an external collaborator: it may be slow and it may produce
/// arbitrarily malformed output. Malformed-but-present output is a validator
/// concern and must not surface as an error here; only genuine transport
/// failures do.
pub trait TextBackend: Send + Sync {
    /// Backend identifier for diagnostics (e.g. "webgpu", "wasm").
    fn name(&self) -> &str;

    /// Run one completion for `prompt` under the given token budget and
    /// sampling configuration.
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        max_tokens: u32,
        sampling: &'a SamplingConfig,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<RawResponse>> + Send + 'a>>;
}

impl std::fmt::Debug for dyn TextBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBackend")
            .field("name", &self.name())
            .finish()
    }
}

/// One-time initializer for a [`TextBackend`].
///
/// Injectable so tests can simulate slow or failing initialization without a
/// real model runtime.
pub trait BackendLoader: Send + Sync {
    /// Probe which execution pathways are available on this host.
    fn probe(&self) -> DeviceCaps;

    /// Load the backend onto `device`, reporting progress milestones to the
    /// optional observer.
    fn load<'a>(
        &'a self,
        device: Device,
        observer: Option<&'a ProgressObserver>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Arc<dyn TextBackend>>> + Send + 'a>>;
}
