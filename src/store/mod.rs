//! Filesystem persistence for journals, records, and payload files

mod fs;
mod scan;

pub use fs::{DeleteReport, FileFailure, Store, StoreError};
pub use scan::{ScanError, ScanOutcome, scan_root};
