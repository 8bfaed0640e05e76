//! Infrastructure configuration modules.

pub mod logging;
pub mod market;
pub mod settings;
