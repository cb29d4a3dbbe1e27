//! Kardiverse - Memorial platform backend
//!
//! Two lifecycles live here: the sale of a fixed run of numbered legacy
//! licenses (reserve, purchase, discount, availability) and WakeRoom
//! sessions, timed visits to AR/VR memorial experiences.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
