pub mod cell;
pub mod error;
pub mod export;
pub mod filter;
pub mod formatting;
pub mod headers;
pub mod loader;
pub mod paged_reader;
pub mod parser;
pub mod report;
pub mod settings;
pub mod summary;
