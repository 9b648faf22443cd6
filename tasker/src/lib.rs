//! A small command-line task manager backed by a single JSON file.
//!
//! Layers, leaf first: [`store`] reads and writes the whole file,
//! [`repository`] maps task operations onto it, [`usecases`] validates
//! input and enforces the task lifecycle, and [`cli`] turns commands into
//! messages and exit statuses.

pub mod cli;
pub mod config;
pub mod repository;
pub mod store;
pub mod task;
pub mod usecases;

pub use task::{Status, Task};
