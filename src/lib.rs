// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

pub mod common;
pub mod logging;
pub mod ordering;
pub mod store;
pub mod story;
pub mod user_config;
pub mod utils;

// Re-export commonly used types
pub use ordering::{
    CollectionConfig, CollectionState, Direction, MoveOutcome, MoveReport, OrderError,
    OrderedCollection, Snapshot,
};
pub use store::{HttpStore, MarkdownStore, MemoryStore, RankStore, Ranked, StoreError};
pub use story::{
    create_story, delete_story, get_story, list_active_stories, list_stories, update_story,
    CreateStoryOptions, Story, StoryError, StoryStatus, UpdateStoryOptions,
};
pub use user_config::{load_user_config, UserConfig, UserConfigError};
