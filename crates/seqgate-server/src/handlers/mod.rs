//! Request handlers for the seqgate gateway.
//!
//! Each handler owns the shared store handle and the validated options,
//! builds a fresh domain component per request and hands the controller
//! an outcome receiver plus a cancellation handle. Clients going away
//! mid-request cancel through the handle; nothing is delivered after.

mod authorize;
mod fileinfo;

pub use authorize::AuthorizeHandler;
pub use fileinfo::FileinfoHandler;
