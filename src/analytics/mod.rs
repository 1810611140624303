//! The aggregation engine: ranking, weekly trend, and share-of-total
//! views over physician billing records.
//!
//! Each view is a pure function of the submitted record list. The only
//! filter input that reaches the engine is the ranking size limit;
//! every other selection is the caller's responsibility.

pub mod ranking;
pub mod series;
pub mod share;
pub mod types;
pub mod utility;
