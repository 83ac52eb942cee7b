pub mod resolver;
pub mod search;
pub mod types;

pub use resolver::{QueryConfig, QueryMode, QueryResolver, ShortPatternPolicy};
pub use search::{AcceleratedSearch, IntervalSearch, NaiveSearch, SearchRange};
pub use types::{Query, QueryHit};
