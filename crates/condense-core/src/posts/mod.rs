//! Professional post generation with saved history

mod generator;
mod prompt;
mod store;

pub use generator::{GeneratedPost, POST_MAX_TOKENS, POST_TEMPERATURE, PostGenerator};
pub use prompt::render_post_prompt;
pub use store::{Post, PostStore};
