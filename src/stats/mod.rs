//! Corpus-wide statistics over speech segments.

mod aggregator;
mod summary;

pub use aggregator::CorpusAggregator;
pub use summary::{CorpusStats, Quartiles, mean, population_std, quantile, quartiles};
