use diesel::result::Error as DieselError;
use validator::ValidationErrors;

use crate::data::models::{SrsError, StoreError};

impl From<ValidationErrors> for SrsError {
    fn from(err: ValidationErrors) -> Self {
        SrsError::Validation(err.to_string())
    }
}

impl From<DieselError> for SrsError {
    fn from(err: DieselError) -> Self {
        SrsError::Store(StoreError::Database(err))
    }
}
