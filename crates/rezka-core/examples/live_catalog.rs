use rezka_core::RezkaScraper;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(content_id), Some(translator_id)) = (args.next(), args.next()) else {
        eprintln!("usage: live_catalog <content-id> <translator-id>");
        std::process::exit(2);
    };

    let scraper = RezkaScraper::new()?;

    println!("Fetching episodes for title {} (translator {})...\n", content_id, translator_id);

    let catalog = scraper.get_catalog(&content_id, &translator_id).await?;

    for season in catalog.list_seasons() {
        let episodes = catalog.list_episodes(season);
        println!("Season {} ({} episodes)", season, episodes.len());

        for episode in episodes {
            let locator = catalog
                .stream(season, episode)
                .filter(|stream| stream.has_locator())
                .map(|stream| stream.url.as_str())
                .unwrap_or("-");
            println!("  E{:02} {}", episode, locator);
        }
    }

    println!("\n{} episodes in {} seasons.", catalog.len(), catalog.season_count());

    Ok(())
}
