use std::{env, path::PathBuf};

use storyline_lib::{
    commands::{imports, stories},
    core::config::AppConfig,
    init_logging, AppState,
};

fn usage() {
    eprintln!("Usage:");
    eprintln!("  storyline import-story <story.json>");
    eprintln!("  storyline import-posts <story.json>");
    eprintln!("  storyline import-merged <story.json>");
    eprintln!("  storyline export [story_id]");
    eprintln!("  storyline sync <story_id>");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage();
        std::process::exit(1);
    }

    let app_root = env::current_dir()?;
    let config = AppConfig::from_env(&app_root)?;
    let state = AppState::initialize(config).await?;

    match (args[1].as_str(), args.get(2)) {
        ("import-story", Some(path)) => {
            let story = imports::import_story_file(&state, &PathBuf::from(path)).await?;
            println!("Imported story {} with {} sections", story.id, story.sections.len());
        }
        ("import-posts", Some(path)) => {
            let posts = imports::import_section_posts_file(&state, &PathBuf::from(path)).await?;
            println!("Imported {} posts", posts.len());
        }
        ("import-merged", Some(path)) => {
            let post = imports::import_merged_post_file(&state, &PathBuf::from(path)).await?;
            println!("Imported merged post {} with {} media", post.id, post.media.len());
        }
        ("export", story_id) => {
            let payload = match story_id {
                Some(raw) => stories::get_story_payload(&state, raw.parse()?).await?,
                None => stories::get_latest_story_payload(&state).await?,
            };
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        ("sync", Some(raw)) => {
            let outcome = imports::sync_snapshot(&state, raw.parse()?).await;
            println!("{outcome:?}");
        }
        _ => {
            usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
