//! User-facing notification plumbing for the madrasa console.
//!
//! Every failed data operation surfaces as a [`Toast`] on the [`ToastBus`];
//! the view layer subscribes and renders them. This is the console's only
//! user-visible error channel.

pub mod toast;

pub use toast::{Toast, ToastBus, ToastLevel};
