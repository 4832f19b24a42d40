//! # learnhub-client
//!
//! Leptos + WASM frontend for the LearnHub lesson-sharing platform.
//! Authentication, role-gated dashboards, lesson browsing, and the premium
//! checkout flow, all consumed from external services: an identity provider,
//! a REST backend, and a redirect-based payment processor.
//!
//! This crate contains pages, components, application state, the identity
//! provider client, and the authenticated request gateway. Browser-dependent
//! code is gated behind the `csr` feature so the state and decision logic can
//! be tested natively.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;
