use std::process::ExitCode;

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use launderwatch::config::{Config, NetworkConfig};
use launderwatch::core::logs::DepositDecoder;
use launderwatch::core::pipeline::{PipelineOutput, run_pipeline};
use launderwatch::error::SetupError;
use launderwatch::feed::start_feed_reader;
use launderwatch::notifications::Notifier;
use launderwatch::publish::JsonLinesPublisher;
use launderwatch::rpc::{FixedChain, connect};
use launderwatch::Detector;

#[tokio::main]
async fn main() -> ExitCode {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "launderwatch=info".parse() {
        filter = filter.add_directive(directive);
    }
    // Findings go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("launderwatch starting...");

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".into());
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!("Config: {:?}", config);

    let detector = match setup_detector(&config).await {
        Ok(detector) => detector,
        Err(e) => {
            tracing::error!("Setup failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    let decoder = match detector.settings() {
        Some(settings) => DepositDecoder::new(settings.watched_addresses.iter().copied()),
        None => return ExitCode::FAILURE,
    };

    // Feed → Pipeline channel
    let (feed_tx, feed_rx) = mpsc::unbounded_channel();
    // Pipeline → publisher channel
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<PipelineOutput>();

    let feed_handle = start_feed_reader(config.feed.path.clone(), feed_tx);
    let pipeline_handle = tokio::spawn(run_pipeline(feed_rx, out_tx, detector, decoder));
    tracing::info!("Pipeline started");

    let notifier = Notifier::new(&config.notifications);
    let mut publisher = JsonLinesPublisher::new(std::io::stdout().lock());

    while let Some(output) = out_rx.recv().await {
        let PipelineOutput::Findings { tx_hash, findings } = output;
        if let Err(e) = publisher.publish(&tx_hash, &findings) {
            tracing::error!("Failed to publish findings for {tx_hash}: {e}");
            return ExitCode::FAILURE;
        }
        for finding in &findings {
            notifier.notify(finding);
        }
    }

    if let Err(e) = pipeline_handle.await {
        tracing::error!("Pipeline task failed: {e}");
        return ExitCode::FAILURE;
    }
    match feed_handle.await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => {
            tracing::error!("Feed reader failed: {e}");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            tracing::error!("Feed reader task failed: {e}");
            return ExitCode::FAILURE;
        }
    }

    tracing::info!("Published {} findings", publisher.published());
    ExitCode::SUCCESS
}

async fn setup_detector(config: &Config) -> Result<Detector, SetupError> {
    let NetworkConfig {
        rpc_url,
        rpc_user,
        rpc_password,
        chain_id,
    } = &config.network;

    if let Some(chain_id) = chain_id {
        tracing::info!("Using configured chain id {chain_id}");
        return Detector::setup(&config.detector, &FixedChain(*chain_id)).await;
    }

    let credentials = match (rpc_user, rpc_password) {
        (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
        _ => None,
    };
    let provider = connect(rpc_url, credentials)?;
    tracing::info!(rpc_url = %rpc_url, "Resolving chain id from node");
    Detector::setup(&config.detector, &provider).await
}
