//! Captain Click - guarded generation of personalized math explanations.
//!
//! A learner profile, a topic and a lesson stage go in; a short, child-safe
//! explanation or practice question comes out. Model output is parsed and
//! checked against per-topic rules, and curated fallback content replaces it
//! whenever anything goes wrong.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
