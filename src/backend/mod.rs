// ── Infrastructure ───────────────────────────────────────────────────────────
pub mod device;
pub mod response;
pub mod traits;

// ── Lifecycle ────────────────────────────────────────────────────────────────
pub mod handle;
pub mod offline;

// ── Re-exports ───────────────────────────────────────────────────────────────
pub use device::{Device, DeviceCaps};
pub use handle::{BackendHandle, BackendState, LoadProgress, LoadStatus, ProgressObserver};
pub use offline::OfflineLoader;
pub use response::{ChatTurn, RawResponse};
pub use traits::{BackendLoader, TextBackend};
