//! Top-level facade crate for pingmeter.
//!
//! Re-exports the registry core and the service layer so users can depend on a single crate.

pub mod core {
    pub use pingmeter_core::*;
}

pub mod service {
    pub use pingmeter_service::*;
}
