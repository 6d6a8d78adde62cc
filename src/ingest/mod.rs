//! Upload handling around the core pipeline: admission, placement,
//! device snapshots, and the records handed to the durable store.

mod device;
mod intake;
mod records;
mod service;
mod store;

pub use device::{DeviceFingerprinter, DeviceSnapshot, HostFingerprinter, RequestInfo};
pub use intake::{check_upload, extension_of, place_upload, IntakeError};
pub use records::{AudioFileRecord, AudioFileSummary, AudioMetadataRecord, User, UserId};
pub use service::{IngestError, IngestService};
pub use store::{JsonLinesStore, MemoryStore, RecordStore, StoreError};
