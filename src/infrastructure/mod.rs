//! Infrastructure layer - Reference stores and process setup

pub mod logging;
pub mod reference;
