use aws_config::{BehaviorVersion, Region};
use bucketbill::cli::Cli;
use bucketbill::config::{Config, ConfigLoader};
use bucketbill::core::{Aggregator, ConsoleSink, NullSink, UsageCollector};
use bucketbill::sources::{CloudWatchMetrics, S3Locator};
use bucketbill::utils::init_logging;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse_args();
    init_logging();

    // Handle configuration commands
    if cli.init {
        Config::init()?;
        return Ok(());
    }

    if cli.print {
        let mut config = match &cli.config_path {
            Some(path) => ConfigLoader::load_from_path(path)?,
            None => Config::load().unwrap_or_else(|_| Config::default()),
        };
        config.apply_env();
        config.apply_cli(&cli);
        config.print()?;
        return Ok(());
    }

    if cli.check {
        ConfigLoader::resolve(&cli)?;
        println!("✓ Configuration valid");
        return Ok(());
    }

    let config = ConfigLoader::resolve(&cli)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    rt.block_on(estimate(config, cli.json))
}

/// Discover every bucket and print its estimated monthly storage cost
async fn estimate(config: Config, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .profile_name(&config.profile)
        .region(Region::new(config.region.clone()))
        .load()
        .await;

    let locator = Arc::new(S3Locator::new(&sdk_config));
    let metrics = Arc::new(CloudWatchMetrics::new(sdk_config));
    let collector = UsageCollector::new(
        locator.clone(),
        metrics,
        Arc::new(config.price_table()),
        config.region.clone(),
    );

    if json {
        let aggregator = Aggregator::new(collector, Arc::new(NullSink));
        let report = aggregator
            .run_discovered(locator.as_ref(), config.concurrency)
            .await;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let console = Arc::new(ConsoleSink::stdout(config.verbose));
    console.header()?;

    let aggregator = Aggregator::new(collector, console.clone());
    let report = aggregator
        .run_discovered(locator.as_ref(), config.concurrency)
        .await;

    console.footer(report.len(), report.total_size(), report.total_cost())?;
    Ok(())
}
