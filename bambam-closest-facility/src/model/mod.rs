pub mod analysis;
mod app_error;
pub mod coordinate_system;
pub mod network;
pub mod unit;

pub use app_error::CfAppError;
