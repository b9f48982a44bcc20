//! Route handlers

pub mod form;
pub mod predictions;
pub mod schema;
