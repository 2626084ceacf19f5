use std::sync::OnceLock;

/// Whether the preferred HTTP backend can be used in this process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCapability {
    Available,
    Unavailable,
}

static PROCESS_CAPABILITY: OnceLock<TransportCapability> = OnceLock::new();

impl TransportCapability {
    /// Probe the backend now. Never fails; a failed probe yields `Unavailable`.
    #[must_use]
    pub fn detect() -> Self {
        match reqwest::Client::builder().build() {
            Ok(_) => Self::Available,
            Err(e) => {
                tracing::warn!(error = %e, "reqwest backend unavailable, falling back");
                Self::Unavailable
            }
        }
    }

    /// Capability of this process, probed on first use and fixed afterwards.
    #[must_use]
    pub fn process() -> Self {
        *PROCESS_CAPABILITY.get_or_init(Self::detect)
    }

    #[must_use]
    pub fn is_available(self) -> bool {
        self == Self::Available
    }
}
