//! External collaborators of the deployment pipeline
//!
//! Repository lookup for node types, model download URLs and repository
//! checkout.

pub mod channels;
pub mod clone;
pub mod url_cache;

pub use channels::{ChannelMap, RepoResolver};
pub use clone::{CloneSummary, RepoCloner};
pub use url_cache::{ModelFinder, ModelLocator, ModelUrlCache};
