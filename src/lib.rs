//! Client core for the ReWear clothing-swap marketplace.
//!
//! Three pieces: typed wrappers over the hosted entity-CRUD backend
//! ([`api`]), the pure catalog filter/sort engine ([`catalog`]), and the
//! item-listing submission workflow ([`listing`]). All backend collaborators
//! are traits, so the hosted service can be swapped for any other store
//! without touching the UI-facing logic.

pub mod api;
pub mod catalog;
pub mod config;
pub mod listing;
pub mod models;
