use crate::config::ConfigError;
use crate::export::ExportError;
use crate::reader::ReadError;
use crate::validate::ValidationError;

/// Any failure of an import.
#[derive(Debug, thiserror::Error)]
pub enum JdlError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
