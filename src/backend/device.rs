use serde::Serialize;

/// Execution pathway for the generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    /// GPU-accelerated path.
    Accelerated,
    /// Portable CPU path, available almost everywhere.
    Portable,
}

/// Result of the runtime capability probe.
///
/// Consumed by the presentation layer to decide whether generation should be
/// attempted at all, and by [`super::BackendHandle`] to pick the execution
/// device for the one-time load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceCaps {
    pub supported: bool,
    pub accelerated: bool,
    pub portable: bool,
    pub recommended: Option<Device>,
}

impl DeviceCaps {
    /// Derive capabilities from the two pathway probes. The accelerated path
    /// is preferred whenever it is available.
    pub fn detect_from(accelerated: bool, portable: bool) -> Self {
        let recommended = if accelerated {
            Some(Device::Accelerated)
        } else if portable {
            Some(Device::Portable)
        } else {
            None
        };
        Self {
            supported: accelerated || portable,
            accelerated,
            portable,
            recommended,
        }
    }

    /// No pathway available; generation should go straight to fallback.
    pub fn unsupported() -> Self {
        Self::detect_from(false, false)
    }
}
