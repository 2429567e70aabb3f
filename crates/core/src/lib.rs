//! Core library of Plumb, a code-quality dashboard viewer.
//!
//! The crate is organized around a small retained view tree:
//!
//! - [`view`] holds the tree plumbing (events, render queue) and the
//!   widgets, most notably [`view::breadcrumbs::BreadcrumbTrail`];
//! - [`api`] models locations, branch scopes and the ancestor lookup
//!   backend, with an HTTP implementation in [`api::client`];
//! - [`input`] owns the process-wide keyboard claim registry;
//! - [`settings`] and [`logging`] carry configuration and structured
//!   logging for the application shell.

#[macro_use]
pub mod geom;

pub mod api;
pub mod color;
pub mod context;
pub mod framebuffer;
pub mod gesture;
pub mod helpers;
pub mod input;
pub mod logging;
pub mod settings;
pub mod view;
