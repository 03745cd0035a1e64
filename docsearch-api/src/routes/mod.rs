pub(crate) mod error;
pub(crate) mod health;
pub(crate) mod search;

pub(crate) use error::ApiError;

use serde::Serialize;

/// Success envelope shared by all JSON endpoints.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
