use dotenv::dotenv;
use mention_backend::config::Config;
use mention_backend::db::Database;
use mention_backend::mentions::{get_mentions_batch, BatchOptions};
use mention_backend::twitter::TwitterClient;
use mention_backend::{MentionsError, Result};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    if let Err(e) = run().await {
        log::error!("Mentions: run failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::new(&config.database_url)?;

    let client = TwitterClient::new(config.credentials.clone());

    // Debug runs look at hand-picked tweets and never move the resume point
    let debug = config.debug_ids.is_some();
    let since_mention_id = if debug {
        None
    } else {
        db.get_since_mention_id()?
    };
    log::info!(
        "Mentions: resuming from since_mention_id={:?}",
        since_mention_id.as_ref().map(|id| id.as_str())
    );

    let options = BatchOptions {
        debug_ids: config.debug_ids.clone(),
        resolve_all: config.resolve_all,
        force_reply: config.force_reply,
        max_batch_size: config.max_batch_size,
        ..Default::default()
    };

    let batch = get_mentions_batch(&client, &db, &config.rules, since_mention_id, &options).await?;

    for mention in &batch.mentions {
        log::info!(
            "Mentions: {} score={:.3} reply={} prompt={:?}",
            mention.id,
            mention.priority_score.unwrap_or_default(),
            mention.is_reply,
            mention.prompt.as_deref().unwrap_or_default()
        );
    }

    let json = serde_json::to_string_pretty(&batch).map_err(|e| {
        MentionsError::malformed(format!("Failed to serialize batch: {}", e))
    })?;
    println!("{}", json);

    if !debug {
        if let Some(next) = batch.next_since_mention_id() {
            db.save_since_mention_id(&next)?;
            log::info!("Mentions: saved since_mention_id={}", next);
        }
    }

    Ok(())
}
