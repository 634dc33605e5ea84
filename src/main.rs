// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result
    )
)]

use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;
use story_ranks::logging::{init_logging, parse_rotation, LogConfig, LOG_FILENAME};
use story_ranks::ordering::sort_by_rank;
use story_ranks::user_config::{load_user_config, UserConfig};
use story_ranks::utils::default_log_dir;
use story_ranks::{
    create_story, delete_story, get_story, list_active_stories, list_stories, update_story,
    CollectionConfig, CreateStoryOptions, Direction, HttpStore, MarkdownStore, MoveOutcome,
    OrderedCollection, RankStore, Story, StoryStatus, UpdateStoryOptions,
};
use tracing::{info, warn, Level};

/// story-ranks - keep the studio's love stories in display order
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Markdown store directory (default: ~/.story-ranks/stories)
    #[arg(long, global = true, env = "STORY_RANKS_STORE_DIR")]
    store_dir: Option<PathBuf>,

    /// Base URL of the studio REST API. `list` and `move` use it instead of
    /// the Markdown store when set.
    #[arg(long, global = true, env = "STORY_RANKS_API_URL")]
    api_url: Option<String>,

    /// Per-write timeout for rank updates, in milliseconds
    #[arg(long, global = true, env = "STORY_RANKS_WRITE_TIMEOUT_MS")]
    write_timeout_ms: Option<u64>,

    /// Enable JSON log format
    #[arg(long, global = true, env = "STORY_RANKS_LOG_JSON", default_value = "false")]
    log_json: bool,

    /// Log rotation period: daily, hourly, or never
    #[arg(long, global = true, env = "STORY_RANKS_LOG_ROTATION", default_value = "daily")]
    log_rotation: String,

    /// Custom log directory (default: ~/.story-ranks/logs)
    #[arg(long, global = true, env = "STORY_RANKS_LOG_DIR")]
    log_dir: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stories in display order
    List {
        /// Only stories shown on the public site
        #[arg(long)]
        active: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one story
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Create a story
    Create {
        #[arg(long)]
        title: String,
        /// Main image reference
        #[arg(long)]
        thumbnail: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Gallery image reference (repeatable)
        #[arg(long = "gallery")]
        gallery: Vec<String>,
        /// Active or Inactive
        #[arg(long)]
        status: Option<StoryStatus>,
        /// Display priority (1 is highest)
        #[arg(long)]
        order: Option<u32>,
    },
    /// Edit fields of a story
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        thumbnail: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Replace the gallery with these images (repeatable)
        #[arg(long = "gallery")]
        gallery: Vec<String>,
        /// Remove every gallery image
        #[arg(long, conflicts_with = "gallery")]
        clear_gallery: bool,
        #[arg(long)]
        status: Option<StoryStatus>,
        #[arg(long)]
        order: Option<u32>,
    },
    /// Delete a story
    Delete { id: String },
    /// Move a story one position up or down
    Move { id: String, direction: Direction },
}

/// Effective settings after merging flags, env and the user config file.
#[derive(Debug)]
struct Settings {
    store_dir: PathBuf,
    api_url: Option<String>,
    write_timeout: Duration,
}

impl Settings {
    fn resolve(args: &Args, user_cfg: &UserConfig) -> Self {
        Self {
            store_dir: args
                .store_dir
                .clone()
                .unwrap_or_else(|| user_cfg.store_dir()),
            api_url: args
                .api_url
                .clone()
                .or_else(|| user_cfg.store.api_url.clone()),
            write_timeout: args
                .write_timeout_ms
                .map_or_else(|| user_cfg.write_timeout(), Duration::from_millis),
        }
    }

    fn markdown_store(&self, command: &str) -> Result<MarkdownStore> {
        if self.api_url.is_some() {
            bail!("`{command}` works on the local Markdown store only; drop --api-url to use it");
        }
        Ok(MarkdownStore::new(&self.store_dir))
    }
}

/// `None` keeps the stored gallery; `--clear-gallery` empties it.
fn gallery_update(gallery: Vec<String>, clear: bool) -> Option<Vec<String>> {
    if clear {
        Some(Vec::new())
    } else if gallery.is_empty() {
        None
    } else {
        Some(gallery)
    }
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

fn print_table(stories: &[Story]) {
    if stories.is_empty() {
        println!("No stories.");
        return;
    }
    for story in stories {
        let rank = story
            .order
            .map_or_else(|| "-".to_string(), |order| order.to_string());
        println!(
            "{rank:>4}  {status:<8}  {id}  {title}",
            status = story.status,
            id = story.id,
            title = story.title
        );
    }
}

fn print_story(story: &Story) {
    println!("id:          {}", story.id);
    println!("title:       {}", story.title);
    println!(
        "order:       {}",
        story.order.map_or_else(|| "-".to_string(), |o| o.to_string())
    );
    println!("status:      {}", story.status);
    println!("location:    {}", story.location);
    println!("thumbnail:   {}", story.thumbnail);
    println!("gallery:     {} image(s)", story.gallery.len());
    println!("created:     {}", story.created_at);
    println!("updated:     {}", story.updated_at);
    if !story.description.is_empty() {
        println!();
        println!("{}", story.description);
    }
}

async fn list_remote(api_url: &str, active: bool) -> Result<Vec<Story>> {
    let store = HttpStore::new(api_url)?;
    let mut stories = store.fetch_all().await?;
    sort_by_rank(&mut stories);
    if active {
        stories.retain(|s| s.status.is_public());
    }
    Ok(stories)
}

async fn move_story<S>(store: S, id: &str, direction: Direction, config: CollectionConfig) -> Result<()>
where
    S: RankStore<Record = Story>,
{
    let mut collection = OrderedCollection::open(store, config).await?;
    let report = collection.move_record(id, direction).await?;

    match report.outcome {
        MoveOutcome::Applied { writes } => {
            info!(id, %direction, writes, "Story moved");
            println!("Moved {id} {direction}.");
        }
        MoveOutcome::Boundary => {
            println!("{id} is already at the {} of the list.", match direction {
                Direction::Up => "top",
                Direction::Down => "bottom",
            });
        }
        MoveOutcome::Resynced { failed_writes } => {
            eprintln!(
                "Warning: {failed_writes} rank update(s) failed; showing the order currently stored."
            );
        }
    }
    print_table(&report.records);
    Ok(())
}

async fn run(command: Command, settings: &Settings) -> Result<()> {
    match command {
        Command::List { active, json } => {
            let stories = match settings.api_url.as_deref() {
                Some(api_url) => list_remote(api_url, active).await?,
                None => {
                    let store = MarkdownStore::new(&settings.store_dir);
                    if active {
                        list_active_stories(&store).await?
                    } else {
                        list_stories(&store).await?
                    }
                }
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&stories)?);
            } else {
                print_table(&stories);
            }
        }
        Command::Show { id, json } => {
            let store = settings.markdown_store("show")?;
            let story = get_story(&store, &id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&story)?);
            } else {
                print_story(&story);
            }
        }
        Command::Create {
            title,
            thumbnail,
            location,
            description,
            gallery,
            status,
            order,
        } => {
            let store = settings.markdown_store("create")?;
            let story = create_story(
                &store,
                CreateStoryOptions {
                    title,
                    location,
                    description,
                    thumbnail,
                    gallery,
                    status,
                    order,
                },
            )
            .await?;
            println!("Created {}", story.id);
        }
        Command::Update {
            id,
            title,
            thumbnail,
            location,
            description,
            gallery,
            clear_gallery,
            status,
            order,
        } => {
            let store = settings.markdown_store("update")?;
            let gallery = gallery_update(gallery, clear_gallery);
            let story = update_story(
                &store,
                &id,
                UpdateStoryOptions {
                    title,
                    location,
                    description,
                    thumbnail,
                    gallery,
                    status,
                    order,
                },
            )
            .await?;
            println!("Updated {}", story.id);
        }
        Command::Delete { id } => {
            let store = settings.markdown_store("delete")?;
            delete_story(&store, &id).await?;
            println!("Deleted {id}");
        }
        Command::Move { id, direction } => {
            let config = CollectionConfig {
                write_timeout: settings.write_timeout,
            };
            match settings.api_url.as_deref() {
                Some(api_url) => move_story(HttpStore::new(api_url)?, &id, direction, config).await?,
                None => {
                    let store = MarkdownStore::new(&settings.store_dir);
                    move_story(store, &id, direction, config).await?;
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks for colored error output
    color_eyre::install()?;

    let args = Args::parse();

    let log_dir = args
        .log_dir
        .as_ref()
        .map_or_else(default_log_dir, PathBuf::from);
    let log_file = log_dir.join(LOG_FILENAME);

    let log_config = LogConfig {
        log_dir,
        log_level: log_level(args.verbose),
        json_format: args.log_json,
        rotation: parse_rotation(&args.log_rotation),
    };

    if let Err(e) = init_logging(log_config) {
        eprintln!("Error: Failed to initialize logging: {e}");
        eprintln!("Logs: {}", log_file.display());
        return Err(e);
    }

    // ~/.story-ranks/config.toml is optional
    let user_cfg = load_user_config().unwrap_or_else(|e| {
        warn!("Failed to load user config, using defaults: {e}");
        UserConfig::default()
    });

    let settings = Settings::resolve(&args, &user_cfg);
    info!(
        store_dir = %settings.store_dir.display(),
        api_url = settings.api_url.as_deref().unwrap_or("-"),
        "Resolved settings"
    );

    run(args.command, &settings).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_move_command() {
        let args = Args::try_parse_from(["story-ranks", "move", "abc", "UP"]).unwrap();
        match args.command {
            Command::Move { id, direction } => {
                assert_eq!(id, "abc");
                assert_eq!(direction, Direction::Up);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Args::try_parse_from(["story-ranks", "move", "abc", "sideways"]).is_err());
    }

    #[test]
    fn test_parse_create_with_status() {
        let args = Args::try_parse_from([
            "story-ranks",
            "create",
            "--title",
            "Lakeside",
            "--thumbnail",
            "t.jpg",
            "--status",
            "inactive",
            "--gallery",
            "a.jpg",
            "--gallery",
            "b.jpg",
        ])
        .unwrap();
        let Command::Create { status, gallery, order, .. } = args.command else {
            panic!("expected create");
        };
        assert_eq!(status, Some(StoryStatus::Inactive));
        assert_eq!(gallery, vec!["a.jpg", "b.jpg"]);
        assert_eq!(order, None);
    }

    #[test]
    fn test_parse_update_gallery() {
        let args = Args::try_parse_from([
            "story-ranks",
            "update",
            "abc",
            "--gallery",
            "x.jpg",
            "--gallery",
            "y.jpg",
        ])
        .unwrap();
        let Command::Update { gallery, clear_gallery, .. } = args.command else {
            panic!("expected update");
        };
        assert_eq!(
            gallery_update(gallery, clear_gallery),
            Some(vec!["x.jpg".to_string(), "y.jpg".to_string()])
        );

        let args = Args::try_parse_from(["story-ranks", "update", "abc", "--title", "T"]).unwrap();
        let Command::Update { gallery, clear_gallery, .. } = args.command else {
            panic!("expected update");
        };
        assert_eq!(gallery_update(gallery, clear_gallery), None);

        let args = Args::try_parse_from(["story-ranks", "update", "abc", "--clear-gallery"]).unwrap();
        let Command::Update { gallery, clear_gallery, .. } = args.command else {
            panic!("expected update");
        };
        assert_eq!(gallery_update(gallery, clear_gallery), Some(Vec::new()));

        assert!(Args::try_parse_from([
            "story-ranks",
            "update",
            "abc",
            "--clear-gallery",
            "--gallery",
            "x.jpg"
        ])
        .is_err());
    }

    #[test]
    fn test_settings_flags_override_user_config() {
        let user_cfg: UserConfig = toml::from_str(
            "[store]\ndir = \"/from/config\"\napi_url = \"http://config\"\n[ordering]\nwrite_timeout_ms = 700\n",
        )
        .unwrap();

        let args = Args::try_parse_from(["story-ranks", "list"]).unwrap();
        let settings = Settings::resolve(&args, &user_cfg);
        assert_eq!(settings.store_dir, PathBuf::from("/from/config"));
        assert_eq!(settings.api_url.as_deref(), Some("http://config"));
        assert_eq!(settings.write_timeout, Duration::from_millis(700));

        let args = Args::try_parse_from([
            "story-ranks",
            "--store-dir",
            "/from/flag",
            "--write-timeout-ms",
            "5",
            "list",
        ])
        .unwrap();
        let settings = Settings::resolve(&args, &user_cfg);
        assert_eq!(settings.store_dir, PathBuf::from("/from/flag"));
        assert_eq!(settings.write_timeout, Duration::from_millis(5));
    }

    #[test]
    fn test_markdown_only_commands_refuse_api_url() {
        let settings = Settings {
            store_dir: PathBuf::from("/tmp"),
            api_url: Some("http://localhost".to_string()),
            write_timeout: Duration::from_secs(1),
        };
        assert!(settings.markdown_store("create").is_err());
    }

    #[test]
    fn test_log_level_from_verbosity() {
        assert_eq!(log_level(0), Level::WARN);
        assert_eq!(log_level(1), Level::INFO);
        assert_eq!(log_level(5), Level::DEBUG);
    }
}
