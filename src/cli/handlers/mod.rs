pub mod browse;
pub mod config;
pub mod metadata;
pub mod random;
pub mod search;
pub mod serve;
