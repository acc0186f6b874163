//! Bearer-token models and the credential sources that mint them.

pub mod source;
pub mod token;

pub use source::*;
pub use token::*;
