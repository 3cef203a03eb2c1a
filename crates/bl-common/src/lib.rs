//! Busline shared infrastructure.
//!
//! Currently holds the logging setup used by every binary. Domain types
//! live in `bl-identity`.

pub mod logging;
