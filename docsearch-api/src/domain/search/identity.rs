//! Synthetic result ids.
//!
//! An id is `base64("{source}:{key}")` where the key is the result's url, title or
//! serialized form. Ids are a pure function of the result, so clients can correlate
//! the same result across requests without a database round trip.

use std::collections::HashSet;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::types::{SourceKind, SourceResult};

pub fn synthetic_id(source: SourceKind, key: &str) -> String {
    STANDARD.encode(format!("{}:{}", source, key))
}

/// Hands out ids that are unique within one response.
///
/// Results from different sources never collide because the source name is part of
/// the id. A source returning the same key twice gets `#2`, `#3`, ... appended to the
/// key for the repeats, in fetch order.
#[derive(Debug, Default)]
pub struct IdAssigner {
    issued: HashSet<String>,
}

impl IdAssigner {
    pub fn assign(&mut self, result: &SourceResult) -> String {
        let source = result.kind();
        let key = result.identity_key();

        let mut id = synthetic_id(source, &key);
        let mut n = 2;
        while self.issued.contains(&id) {
            id = synthetic_id(source, &format!("{}#{}", key, n));
            n += 1;
        }

        self.issued.insert(id.clone());
        id
    }
}
