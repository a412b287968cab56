#[macro_use]
extern crate log;

pub mod action;
pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod rating;
pub mod theme;

pub use action::{Action, Dispatcher, Outcome, Page};
pub use api::{ApiClient, ApiRequest, ApiResponse, CsrfToken, Transport};
pub use config::Config;
pub use error::{ApiError, PayloadError};
pub use model::FieldSource;
pub use notify::{Notifier, Toast, ToastKind};
pub use theme::{Theme, ThemeController, ThemeStore};
