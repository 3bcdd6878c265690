//! scrapewatch
//!
//! This library backs two binaries: the `scrapewatch` API server, which runs
//! coin market scraping jobs against Redis-held job state, and the
//! `ticket-alert` run, which watches a ticket shop page and emails
//! subscribers when new ticket statuses appear.

pub mod app_state;
pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod services;
