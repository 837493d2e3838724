use diesel::ConnectionError;
use diesel::r2d2::PoolError;
use diesel::result::Error as DieselError;
use thiserror::Error;

// Storage collaborator failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DieselError),
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// Scheduler and orchestration errors
#[derive(Error, Debug)]
pub enum SrsError {
    #[error("Response quality must be between 0 and 5, got {0}")]
    InvalidQuality(i32),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SrsError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SrsError::InvalidQuality(_) | SrsError::Validation(_))
    }
}
