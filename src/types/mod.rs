//! Types for SES Query API operations.
//!
//! This module provides the request parameter map, the validated email
//! request and typed views over parsed responses.

mod email;
mod parameters;
mod responses;

pub use email::*;
pub use parameters::*;
pub use responses::*;
