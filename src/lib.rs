pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod identity;
pub mod location;
pub mod logging;
pub mod memo;
pub mod merge;
pub mod reconcile;
pub mod scan;
pub mod sync;
pub mod utils;
pub mod vcs;
