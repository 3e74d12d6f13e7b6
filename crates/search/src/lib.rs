pub mod client;
pub mod conventions;
pub mod error;
pub mod renderer;
pub mod request;

pub use client::{Client, TypeSearch};
pub use conventions::{ClientConventions, FieldNameConvention};
pub use error::{Result, SearchError};
pub use renderer::{render_filter, render_request};
pub use request::{SearchRequest, SearchRequestBuilder};
