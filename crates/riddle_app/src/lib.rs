//! Riddle command line front end: settings persistence, logging setup and
//! media lookups on top of the cached feed.
pub mod commands;
pub mod logging;
pub mod persistence;
