//! Domain model: installments, penalty policies, balance resolution, and the
//! ports through which the application reaches its collaborators.

pub mod balance;
pub mod installment;
pub mod money;
pub mod payment;
pub mod penalty;
pub mod ports;
