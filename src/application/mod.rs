//! Application layer orchestrating a payment request.
//!
//! This module defines the `PaymentService`, the primary entry point for turning a
//! submitted payment form into a summary, a confirmation, and a stored record.

pub mod service;
