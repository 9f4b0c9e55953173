//! Headless address autocomplete.
//!
//! [`autocomplete`] owns the widget state: input text, selection, the option
//! list and the loading flag. It debounces keystrokes, runs one cancellable
//! search at a time through a [`client::Search`] backend and publishes
//! [`autocomplete::Snapshot`]s. [`render`] turns a snapshot into highlighted
//! dropdown rows.

pub mod autocomplete;
pub mod client;
pub mod config;
pub mod debounce;
pub mod highlight;
pub mod models;
pub mod options;
pub mod render;
pub mod session;
