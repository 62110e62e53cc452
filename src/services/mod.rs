//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers:
//! the charge-then-record payment pipeline and the processor client it
//! talks to.

pub mod payment_service;
pub mod processor;
