//! Common types and utilities shared by the Taoyuan data tools.

pub mod error;
pub mod filter;
pub mod logging;
pub mod output;

pub use error::{CommonError, CommonResult};
pub use filter::CityFilter;
pub use output::{write_json_atomic, JsonStyle};
