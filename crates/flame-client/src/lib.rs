//! Headless client core for the Flame dating app.
//!
//! Views (`ProfileEditor`, `OnboardingFlow`, `FeedView`, `MatchesView`,
//! `ChatView`) hold their own state and take an [`AppContext`] for every side
//! effect. Rendering is left to the caller.

pub mod api;
pub mod auth;
pub mod chat;
pub mod config;
pub mod context;
pub mod deck;
pub mod error;
pub mod feed;
pub mod matches;
pub mod onboarding;
pub mod profile;
pub mod realtime;
pub mod request;
pub mod scope;

pub use config::{ClientConfig, DeckConfig};
pub use context::{AppContext, AppContextInner, Route};
pub use error::{ClientError, Result};
pub use request::ApiClient;
pub use scope::ViewScope;
