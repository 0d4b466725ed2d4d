pub mod cli;
pub mod color;
pub mod error;
pub mod export;
pub mod generator;
pub mod history;
pub mod model;
pub mod preview;
pub mod scheme;
pub mod session;
pub mod storage;
pub mod tui;
