//! Index backend implementations.

mod elastic;
#[cfg(test)]
mod mock;

pub use elastic::ElasticBackend;
#[cfg(test)]
pub use mock::MockIndexBackend;
