//! Infrastructure layer for the client application.
//!
//! Contains the I/O-facing adapters: the TCP named-event channel and the
//! renderers that present game state.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `checkers_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`network`** – `Channel`: connects to the server, runs the receive and
//!   writer tasks, and implements `EventCaller` for the interaction translator.
//!
//! - **`render`** – The `RenderAdapter` trait, an ASCII terminal renderer, and a
//!   recording renderer for tests.

pub mod network;
pub mod render;
