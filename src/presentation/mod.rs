//! Payload shapes sent to the panel.

pub mod views;
