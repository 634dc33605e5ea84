//! Directory-of-Markdown store for stories.
//!
//! Each story lives in `<dir>/<id>.md`. Writes go through
//! [`atomic_write`](crate::utils::atomic_write) so a crashed rank update never
//! leaves a half-written document behind.

use super::{RankStore, StoreError};
use crate::common::parse_document;
use crate::story::{Story, StoryFrontmatter};
use crate::utils::{atomic_write, is_story_file, is_valid_story_id, now_iso, story_path};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct MarkdownStore {
    dir: PathBuf,
}

impl MarkdownStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Document path for `id`; ids that would escape the directory are refused.
    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_story_id(id) {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(story_path(&self.dir, id))
    }

    /// Read one story.
    pub async fn read(&self, id: &str) -> Result<Story, StoreError> {
        let path = self.path_for(id)?;
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::not_found(id));
            }
            Err(e) => return Err(e.into()),
        };
        let doc = parse_document::<StoryFrontmatter>(&content).map_err(|source| {
            StoreError::Document {
                path: path.display().to_string(),
                source,
            }
        })?;
        Ok(Story::from_document(id, doc))
    }

    /// Write (create or replace) one story.
    pub async fn write(&self, story: &Story) -> Result<(), StoreError> {
        let path = self.path_for(&story.id)?;
        fs::create_dir_all(&self.dir).await?;
        let content = story.to_markdown().map_err(|source| StoreError::Document {
            path: path.display().to_string(),
            source,
        })?;
        atomic_write(&path, &content).await?;
        debug!(id = %story.id, path = %path.display(), "Wrote story document");
        Ok(())
    }

    /// Delete one story.
    pub async fn remove(&self, id: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(id)?).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Read every story in the directory.
    ///
    /// Documents that fail to parse are skipped with a warning. The result is
    /// ordered by creation time then id, which stands in for the insertion
    /// order a document database would return.
    pub async fn list(&self) -> Result<Vec<Story>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut stories = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = match entry.file_name().to_str() {
                Some(n) => n.to_string(),
                None => continue,
            };
            if !is_story_file(&name) {
                continue;
            }
            let id = Path::new(&name)
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default()
                .to_string();
            match self.read(&id).await {
                Ok(story) => stories.push(story),
                Err(e) => warn!(file = %name, error = %e, "Skipping unreadable story document"),
            }
        }

        stories.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(stories)
    }
}

#[async_trait]
impl RankStore for MarkdownStore {
    type Record = Story;

    async fn fetch_all(&self) -> Result<Vec<Story>, StoreError> {
        self.list().await
    }

    async fn update_order(&self, id: &str, order: u32) -> Result<(), StoreError> {
        let mut story = self.read(id).await?;
        story.order = Some(order);
        story.updated_at = now_iso();
        self.write(&story).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::StoryStatus;

    fn story(id: &str, order: Option<u32>, created_at: &str) -> Story {
        Story {
            id: id.to_string(),
            title: format!("Story {id}"),
            location: String::new(),
            description: "body".to_string(),
            thumbnail: "t.jpg".to_string(),
            gallery: Vec::new(),
            status: StoryStatus::Active,
            order,
            created_at: created_at.to_string(),
            updated_at: created_at.to_string(),
        }
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let temp = tempfile::tempdir().unwrap();
        let store = MarkdownStore::new(temp.path().join("stories"));
        let original = story("a", Some(2), "2024-01-01T00:00:00+00:00");

        store.write(&original).await.unwrap();

        assert!(temp.path().join("stories").join("a.md").exists());
        assert_eq!(store.read("a").await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let temp = tempfile::tempdir().unwrap();
        let store = MarkdownStore::new(temp.path());
        assert!(matches!(store.read("nope").await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.remove("nope").await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_ids_outside_the_store_are_refused() {
        let temp = tempfile::tempdir().unwrap();
        let store = MarkdownStore::new(temp.path().join("stories"));
        let outside = temp.path().join("outside.md");
        std::fs::write(&outside, "---\nthumbnail: t.jpg\n---\n\n# Outside\n").unwrap();

        for id in ["../outside", "a/b", "a\\b", ""] {
            assert!(matches!(store.read(id).await, Err(StoreError::InvalidId(_))), "{id}");
            assert!(matches!(store.remove(id).await, Err(StoreError::InvalidId(_))), "{id}");
            assert!(matches!(
                store.update_order(id, 1).await,
                Err(StoreError::InvalidId(_))
            ));
        }
        let mut escaping = story("x", Some(1), "2024-01-01T00:00:00+00:00");
        escaping.id = "../outside".to_string();
        assert!(matches!(store.write(&escaping).await, Err(StoreError::InvalidId(_))));

        let untouched = std::fs::read_to_string(&outside).unwrap();
        assert!(untouched.contains("# Outside"));
        assert!(!temp.path().join("stories").exists());
    }

    #[tokio::test]
    async fn test_list_missing_dir_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        let store = MarkdownStore::new(temp.path().join("absent"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_orders_by_creation_and_skips_junk() {
        let temp = tempfile::tempdir().unwrap();
        let store = MarkdownStore::new(temp.path());
        store.write(&story("late", Some(1), "2024-02-01T00:00:00+00:00")).await.unwrap();
        store.write(&story("early", Some(2), "2024-01-01T00:00:00+00:00")).await.unwrap();
        std::fs::write(temp.path().join("notes.txt"), "ignored").unwrap();
        std::fs::write(temp.path().join("broken.md"), "no frontmatter").unwrap();

        let ids: Vec<String> = store.list().await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[tokio::test]
    async fn test_update_order_persists_rank_and_touches_timestamp() {
        let temp = tempfile::tempdir().unwrap();
        let store = MarkdownStore::new(temp.path());
        store.write(&story("a", None, "2024-01-01T00:00:00+00:00")).await.unwrap();

        store.update_order("a", 5).await.unwrap();

        let updated = store.read("a").await.unwrap();
        assert_eq!(updated.order, Some(5));
        assert_ne!(updated.updated_at, "2024-01-01T00:00:00+00:00");
        assert_eq!(updated.description, "body");
    }

    #[tokio::test]
    async fn test_update_order_unknown_id() {
        let temp = tempfile::tempdir().unwrap();
        let store = MarkdownStore::new(temp.path());
        assert!(matches!(
            store.update_order("ghost", 1).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
