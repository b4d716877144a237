//! Chat session runtime
//!
//! Owns the conversation store and executes the effects of the submission
//! cycle against an [`AssistantClient`](crate::client::AssistantClient) and a
//! [`Renderer`].

mod executor;
pub mod traits;


pub use executor::ChatSession;
pub use traits::{Renderer, ReplyHandle};
