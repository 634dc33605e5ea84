use super::error::StoryError;
use super::types::{CreateStoryOptions, Story, UpdateStoryOptions, DEFAULT_ORDER};
use crate::ordering::sort_by_rank;
use crate::store::MarkdownStore;
use crate::utils::now_iso;
use tracing::info;

fn validate_order(order: u32) -> Result<u32, StoryError> {
    if order < 1 {
        return Err(StoryError::InvalidOrder(order));
    }
    Ok(order)
}

fn validate_title(title: &str) -> Result<String, StoryError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(StoryError::validation("Title must not be empty"));
    }
    // the stored heading holds a single line
    if trimmed.contains(['\n', '\r']) {
        return Err(StoryError::validation("Title must be a single line"));
    }
    Ok(trimmed.to_string())
}

/// Create a story.
///
/// The thumbnail is mandatory. Status defaults to `Active` and the rank to
/// [`DEFAULT_ORDER`]; the new story is not moved relative to existing ones.
pub async fn create_story(
    store: &MarkdownStore,
    options: CreateStoryOptions,
) -> Result<Story, StoryError> {
    let title = validate_title(&options.title)?;
    if options.thumbnail.trim().is_empty() {
        return Err(StoryError::validation("Main thumbnail is required"));
    }
    let order = validate_order(options.order.unwrap_or(DEFAULT_ORDER))?;

    let now = now_iso();
    let story = Story {
        id: uuid::Uuid::new_v4().to_string(),
        title,
        location: options.location.trim().to_string(),
        description: options.description.trim().to_string(),
        thumbnail: options.thumbnail.trim().to_string(),
        gallery: options.gallery,
        status: options.status.unwrap_or_default(),
        order: Some(order),
        created_at: now.clone(),
        updated_at: now,
    };
    store.write(&story).await?;
    info!(id = %story.id, order, "Created story");
    Ok(story)
}

pub async fn get_story(store: &MarkdownStore, id: &str) -> Result<Story, StoryError> {
    Ok(store.read(id).await?)
}

/// All stories in display order.
pub async fn list_stories(store: &MarkdownStore) -> Result<Vec<Story>, StoryError> {
    let mut stories = store.list().await?;
    sort_by_rank(&mut stories);
    Ok(stories)
}

/// Stories shown on the public site, in display order.
pub async fn list_active_stories(store: &MarkdownStore) -> Result<Vec<Story>, StoryError> {
    let mut stories = list_stories(store).await?;
    stories.retain(|s| s.status.is_public());
    Ok(stories)
}

pub async fn update_story(
    store: &MarkdownStore,
    id: &str,
    options: UpdateStoryOptions,
) -> Result<Story, StoryError> {
    let mut story = store.read(id).await?;

    if let Some(title) = options.title {
        story.title = validate_title(&title)?;
    }
    if let Some(thumbnail) = options.thumbnail {
        if thumbnail.trim().is_empty() {
            return Err(StoryError::validation("Main thumbnail is required"));
        }
        story.thumbnail = thumbnail.trim().to_string();
    }
    if let Some(location) = options.location {
        story.location = location.trim().to_string();
    }
    if let Some(description) = options.description {
        story.description = description.trim().to_string();
    }
    if let Some(gallery) = options.gallery {
        story.gallery = gallery;
    }
    if let Some(status) = options.status {
        story.status = status;
    }
    if let Some(order) = options.order {
        story.order = Some(validate_order(order)?);
    }

    story.updated_at = now_iso();
    store.write(&story).await?;
    info!(id, "Updated story");
    Ok(story)
}

/// Delete a story. Remaining ranks are left as they are.
pub async fn delete_story(store: &MarkdownStore, id: &str) -> Result<(), StoryError> {
    store.remove(id).await?;
    info!(id, "Deleted story");
    Ok(())
}
