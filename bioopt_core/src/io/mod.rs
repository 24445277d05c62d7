//! Module for reading and writing Models
pub mod bioopt;
pub mod json;
pub mod optflux;
