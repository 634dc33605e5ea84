//! Common test utilities

use story_ranks::{create_story, CreateStoryOptions, MarkdownStore, Story};
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Create one story per title, ranked in the given order starting at 1.
pub async fn seed_stories(store: &MarkdownStore, titles: &[&str]) -> Vec<Story> {
    let mut stories = Vec::new();
    for (order, title) in (1_u32..).zip(titles) {
        let story = create_story(
            store,
            CreateStoryOptions {
                title: (*title).to_string(),
                thumbnail: format!("{}.jpg", title.to_lowercase()),
                order: Some(order),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to seed story");
        stories.push(story);
    }
    stories
}

/// Titles in display order.
#[allow(dead_code)] // Not every test binary uses it
pub fn titles(stories: &[Story]) -> Vec<String> {
    stories.iter().map(|s| s.title.clone()).collect()
}
