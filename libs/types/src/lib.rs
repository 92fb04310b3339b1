//! Types library for the matching venue
//!
//! Provides the core type definitions shared across every service,
//! ensuring the data model is defined exactly once.
//!
//! # Modules
//! - `ids`: Identifiers (OrderNumber, MatchNumber, SessionId, Instrument)
//! - `numeric`: Tick prices and unit quantities (Price, Quantity)
//! - `order`: Order lifecycle types
//! - `trade`: Trade record types
//! - `errors`: Error taxonomy

pub mod errors;
pub mod ids;
pub mod numeric;
pub mod order;
pub mod trade;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::trade::*;
}
