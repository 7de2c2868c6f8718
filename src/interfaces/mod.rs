//! Input and output formats at the edge of the application.

pub mod csv;
pub mod email;
