pub mod aggregation;
pub mod criteria;
pub mod filter;
pub mod ranking;

pub use aggregation::{percentage, Aggregator, CountryRole, Dimension, Route, Slice};
pub use criteria::FilterCriteria;
pub use filter::{filter, Filter, FilterOutcome};
pub use ranking::{rank_all_nonzero, top_n, Scores};
