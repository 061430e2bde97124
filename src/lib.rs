//! Files and pages sections for a content admin panel.
//!
//! A section lists the files or child pages of a model. Given its settings and
//! a request, [`application::sections::SectionService`] resolves the parent,
//! filters, orders and paginates the items, validates the item count and
//! returns a serializable view model for the panel frontend.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
