//! The batch ingestion run: adapter → normalize → reconcile → persist.
//! All-or-nothing: nothing is written until the whole batch reconciled,
//! and the write itself is atomic.

use std::path::Path;

use anyhow::{Context, bail};
use chrono::Utc;

use sitrep_core::{
    FeedCommand, FeedSource, RawItem, SourceError, TrackerConfig, build_ticker, normalize,
    reconcile, store, templates_from_events, update_ticker,
};

/// Trending items requested per run.
const NEWS_LIMIT: usize = 20;

pub async fn run(
    store_path: &Path,
    config_path: Option<&Path>,
    on_change: Option<&str>,
) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => TrackerConfig::load_from(path)
            .with_context(|| format!("cannot read config at {}", path.display()))?,
        None => TrackerConfig::load().unwrap_or_default(),
    };

    // Load before anything else: a missing or corrupt store aborts the run
    // and must never be replaced with a fresh document.
    let original = store::load(store_path)?;
    tracing::info!(
        "loaded {} events from {}",
        original.events.len(),
        store_path.display()
    );

    let source = FeedCommand::new(&config.adapter);
    let (items, news_items) = collect(&source, &config).await?;
    tracing::info!("normalized {} records, {} trending", items.len(), news_items.len());

    if items.is_empty() && news_items.is_empty() {
        println!("no new items; store unchanged");
        return Ok(());
    }

    let now = Utc::now();
    let existing_count = original.events.len();

    // Trending first, then record items, matching the upstream ticker order.
    let mut ticker_pool = news_items;
    ticker_pool.extend(items.iter().cloned());
    let ticker_lines = build_ticker(&ticker_pool);

    let mut next = reconcile(original.clone(), items, now);
    next = update_ticker(next, ticker_lines);
    next.templates = templates_from_events(&next.events);

    // The reconciler cannot lose events; this guard catches it if that ever
    // stops being true, before anything reaches disk.
    if next.events.len() < existing_count {
        bail!(
            "event count would decrease ({existing_count} -> {}); refusing to save",
            next.events.len()
        );
    }

    let changed = next.events != original.events
        || next.ticker_texts != original.ticker_texts
        || next.templates != original.templates;
    if !changed {
        println!("nothing changed; store untouched");
        return Ok(());
    }

    next.last_updated = Some(now);
    let backup_path = store::backup(store_path, now)?;
    store::save(store_path, &next)?;

    let added = next.events.len() - existing_count;
    println!(
        "saved {}: {} events (+{added} new), {} ticker items, {} templates",
        store_path.display(),
        next.events.len(),
        next.ticker_texts.len(),
        next.templates.len(),
    );
    tracing::debug!("backup at {}", backup_path.display());

    if let Some(hook) = on_change {
        run_hook(hook).await;
    }
    Ok(())
}

/// Query the adapter for keywords, accounts, and trending items. Adapter
/// missing is fatal; a query that runs and fails is logged and skipped.
async fn collect(
    source: &FeedCommand,
    config: &TrackerConfig,
) -> anyhow::Result<(Vec<RawItem>, Vec<RawItem>)> {
    let mut items = Vec::new();

    for keyword in config.keywords.iter().take(config.max_keywords) {
        let args = FeedCommand::search_args(keyword, config.search_limit);
        match source.fetch_raw(&args).await {
            Ok(raw) => items.extend(normalize(&raw)),
            Err(err @ SourceError::AdapterUnavailable(_)) => return Err(err.into()),
            Err(err) => tracing::warn!("search \"{keyword}\" failed: {err}"),
        }
    }

    for account in config.accounts.iter().take(config.max_accounts) {
        let args = FeedCommand::account_args(account, config.search_limit);
        match source.fetch_raw(&args).await {
            Ok(raw) => items.extend(normalize(&raw)),
            Err(err @ SourceError::AdapterUnavailable(_)) => return Err(err.into()),
            Err(err) => tracing::warn!("account @{account} failed: {err}"),
        }
    }

    let news_items = match source.fetch_raw(&FeedCommand::news_args(NEWS_LIMIT)).await {
        Ok(raw) => normalize(&raw)
            .into_iter()
            .filter(|item| config.is_relevant(&item.text))
            .collect(),
        Err(err @ SourceError::AdapterUnavailable(_)) => return Err(err.into()),
        Err(err) => {
            tracing::warn!("trending query failed: {err}");
            Vec::new()
        }
    };

    Ok((items, news_items))
}

/// Deployment trigger: fire-and-forget collaborator, invoked only after the
/// document actually changed. Its failure does not fail the run.
async fn run_hook(hook: &str) {
    tracing::info!("store changed; running hook: {hook}");
    let status = tokio::process::Command::new("sh")
        .arg("-c")
        .arg(hook)
        .status()
        .await;
    match status {
        Ok(code) if code.success() => {}
        Ok(code) => tracing::warn!("change hook exited with {code}"),
        Err(err) => tracing::warn!("change hook failed to start: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    /// Stub adapter: ignores its arguments and prints one NDJSON record.
    fn stub_adapter(dir: &Path) -> PathBuf {
        let path = dir.join("stub-feed");
        std::fs::write(
            &path,
            "#!/bin/sh\necho '{\"text\":\"missile attack reported near haifa\",\"id\":\"t1\",\"author\":{\"username\":\"osint_acct\"}}'\n",
        )
        .unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn write_config(dir: &Path, adapter: &Path) -> PathBuf {
        let path = dir.join("config.json");
        let config = serde_json::json!({
            "adapter": adapter.to_string_lossy(),
            "keywords": ["haifa"],
            "accounts": [],
            "maxKeywords": 1,
            "maxAccounts": 0,
            "searchLimit": 5,
            "relevanceTerms": ["missile"],
        });
        std::fs::write(&path, config.to_string()).unwrap();
        path
    }

    #[tokio::test]
    async fn fetch_reconciles_into_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("data").join("events.json");
        store::init(&store_path).unwrap();
        let config_path = write_config(dir.path(), &stub_adapter(dir.path()));

        run(&store_path, Some(&config_path), None).await.unwrap();

        let saved = store::load(&store_path).unwrap();
        assert_eq!(saved.events.len(), 1);
        assert_eq!(saved.events[0].id, "t1");
        assert!(saved.events[0].is_new);
        assert!(!saved.ticker_texts.is_empty());
        assert_eq!(saved.templates.len(), 1);
        assert!(saved.last_updated.is_some());

        // Replaying the same feed adds nothing.
        run(&store_path, Some(&config_path), None).await.unwrap();
        let saved = store::load(&store_path).unwrap();
        assert_eq!(saved.events.len(), 1);
        assert!(!saved.events[0].is_new);
    }

    #[tokio::test]
    async fn missing_store_aborts_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("data").join("events.json");
        let config_path = write_config(dir.path(), &stub_adapter(dir.path()));

        assert!(run(&store_path, Some(&config_path), None).await.is_err());
        assert!(!store_path.exists());
    }

    #[tokio::test]
    async fn missing_adapter_aborts_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("data").join("events.json");
        store::init(&store_path).unwrap();
        let before = std::fs::read_to_string(&store_path).unwrap();

        let config_path = write_config(dir.path(), Path::new("no-such-adapter-zzz"));
        assert!(run(&store_path, Some(&config_path), None).await.is_err());
        assert_eq!(std::fs::read_to_string(&store_path).unwrap(), before);
    }

    #[tokio::test]
    async fn change_hook_runs_only_on_difference() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("data").join("events.json");
        store::init(&store_path).unwrap();
        let config_path = write_config(dir.path(), &stub_adapter(dir.path()));

        let witness = dir.path().join("deployed");
        let hook = format!("touch {}", witness.display());

        run(&store_path, Some(&config_path), Some(&hook)).await.unwrap();
        assert!(witness.exists());

        // Second run clears isNew (a real change); third run changes nothing.
        run(&store_path, Some(&config_path), None).await.unwrap();
        std::fs::remove_file(&witness).unwrap();
        run(&store_path, Some(&config_path), Some(&hook)).await.unwrap();
        assert!(!witness.exists());
    }
}
