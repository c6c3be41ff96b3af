//! Backend access and user-input handling for TrekSathi.

pub mod client;
pub mod form;
pub mod post;
pub mod types;

pub use client::{TravelApi, TravelApiClient, PLACES_FAILED};
pub use form::{parse_number, FormError, QueryForm};
pub use post::{Comment, Post, PostComposer, PostDraft};
pub use types::*;
pub use uuid::Uuid;
