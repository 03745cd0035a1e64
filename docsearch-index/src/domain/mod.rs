mod bulk;
mod health;
mod search;

pub use bulk::*;
pub use health::*;
pub use search::*;
