pub mod migrate;
pub mod query;
pub mod seed;
pub mod serve;
