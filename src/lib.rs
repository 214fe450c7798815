pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod facets;
pub mod filter;
pub mod output;
pub mod prober;
pub mod query;
pub mod render;
pub mod runner;
pub mod store;

#[cfg(test)]
mod tests;
