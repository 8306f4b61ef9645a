use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{entity} not found: {id}")]
    NotFound {
        entity: &'static str,
        id: Uuid,
    },

    #[error("{entity} {id} cannot be {operation} while {status}")]
    InvalidState {
        entity: &'static str,
        id: Uuid,
        status: String,
        operation: &'static str,
    },

    #[error("charge already void: {id}")]
    AlreadyVoid {
        id: Uuid,
    },

    #[error("invalid allocation of {allocated} against available {available}")]
    InvalidAllocation {
        allocated: Money,
        available: Money,
    },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
