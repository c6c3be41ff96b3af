//! Screen models and text rendering for TrekSathi.
//!
//! Each screen keeps its request state as a `ScreenState`, so loading,
//! error and result can never disagree.

pub mod models;
pub mod render;

pub use models::{LocationDetectionModel, PostsModel, WeatherModel};
