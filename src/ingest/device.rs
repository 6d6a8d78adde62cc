// src/ingest/device.rs
//
// Client/device snapshot attached to each stored upload.

use serde::{Deserialize, Serialize};

/// Device description produced by a fingerprinting collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub browser: String,
    pub browser_version: String,
    pub os: String,
    pub os_version: String,
    /// Platform label, e.g. "X11" or "Macintosh"
    pub platform: String,
    pub is_mobile: bool,
    pub is_tablet: bool,
    pub is_pc: bool,
    pub ip_address: String,
}

impl DeviceSnapshot {
    /// Build a snapshot from a single mobile signal.
    ///
    /// Tablets are not detected separately: `is_tablet` mirrors
    /// `is_mobile`, and `is_pc` is set when neither holds.
    pub fn new(
        browser: impl Into<String>,
        browser_version: impl Into<String>,
        os: impl Into<String>,
        os_version: impl Into<String>,
        platform: impl Into<String>,
        mobile: bool,
        ip_address: impl Into<String>,
    ) -> Self {
        let is_mobile = mobile;
        let is_tablet = mobile;
        Self {
            browser: browser.into(),
            browser_version: browser_version.into(),
            os: os.into(),
            os_version: os_version.into(),
            platform: platform.into(),
            is_mobile,
            is_tablet,
            is_pc: !is_mobile && !is_tablet,
            ip_address: ip_address.into(),
        }
    }
}

/// Request metadata a fingerprinter works from
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    pub user_agent: String,
    pub remote_addr: String,
}

/// Produces a device snapshot for an upload request
pub trait DeviceFingerprinter {
    fn fingerprint(&self, request: &RequestInfo) -> DeviceSnapshot;
}

/// Describes the machine the process runs on. Used for local ingestion
/// where there is no remote client.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFingerprinter;

impl DeviceFingerprinter for HostFingerprinter {
    fn fingerprint(&self, request: &RequestInfo) -> DeviceSnapshot {
        let (browser, browser_version) = match request.user_agent.split_once('/') {
            Some((name, version)) => (name.to_string(), version.to_string()),
            None => (request.user_agent.clone(), String::new()),
        };
        let ip = if request.remote_addr.is_empty() {
            "127.0.0.1".to_string()
        } else {
            request.remote_addr.clone()
        };
        DeviceSnapshot::new(
            browser,
            browser_version,
            std::env::consts::OS,
            "",
            std::env::consts::ARCH,
            false,
            ip,
        )
    }
}
