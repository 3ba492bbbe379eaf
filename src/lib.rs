pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod surface;
pub mod target;

// Re-export main types for convenience
pub use api::{HttpClient, ReqwestClient};
pub use config::Config;
pub use controller::ConversionController;
pub use error::{ConvertError, ErrorCategory, SurfaceError};
pub use model::{ConversionRequest, FeedbackKind, RawResponse, UiState};
pub use surface::{Clipboard, Renderer, SystemClipboard};
pub use target::Target;
