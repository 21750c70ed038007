//! `gsdash`: terminal dashboard for a grid-search task server.

pub mod api;
pub mod app;
pub mod config;
pub mod net;
pub mod notice;
pub mod poll;
pub mod route;
pub mod ui;
pub mod view;

#[cfg(test)]
mod testing;
