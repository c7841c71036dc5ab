//! Writing the converted JSON to its conventional locations.
//!
//! This is the only stage touching the disk: it reads what a previous import
//! left there and writes entity files and `.yo-rc.json` configurations.

pub mod applications;
pub mod deployments;
pub mod entities;
pub mod store;

use std::path::PathBuf;

pub use applications::export_applications;
pub use deployments::export_deployments;
pub use entities::export_entities;
pub use store::{DiskState, FsState, NoDiskState};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(
        "A file named '{}' already exists where the folder of '{name}' must be created.",
        path.display()
    )]
    FolderCollision { path: PathBuf, name: String },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
