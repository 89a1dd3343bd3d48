//! Cross-module scenario and property tests. Everything here drives the
//! pure state machine directly with explicit timestamps; no runtime is
//! involved.

mod lifecycle;
