pub mod bot;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod platform;
pub mod plot;
pub mod post;
pub mod report;
pub mod source;
pub mod speech;
pub mod stats;
pub mod store;
pub mod supervisor;
pub mod title;
