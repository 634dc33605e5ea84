//! Love story records and their create/read/update/delete operations.

mod crud;
mod error;
mod status;
mod types;

pub use crud::{
    create_story, delete_story, get_story, list_active_stories, list_stories, update_story,
};
pub use error::StoryError;
pub use status::{StatusError, StoryStatus};
pub use types::{CreateStoryOptions, Story, StoryFrontmatter, UpdateStoryOptions, DEFAULT_ORDER};
