//! Data models for payments and the request/response types around them.

/// Payment entity and POST /pay request/response types
pub mod payment;
/// Reward tier enumeration and amount table
pub mod tier;
