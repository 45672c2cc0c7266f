use std::io::Read;

use anyhow::{Context, Result};
use cashback_notifier::{
    Config, EnvSecretStore, FsObjectStore, HandlerResponse, HttpDispatcher, PgConnector,
    TriggerEvent, handle_event, setup_logging,
};

fn main() -> Result<()> {
    setup_logging()?;

    let response = respond().unwrap_or_else(|err| {
        tracing::error!("Error processing CSV data: {err:#}");
        HandlerResponse::failure()
    });

    println!("{}", serde_json::to_string(&response)?);

    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

/// Sets everything up and handles the event. Errors returned here happen before the batch starts.
fn respond() -> Result<HandlerResponse> {
    let config = Config::load()?;
    let event = TriggerEvent::from_json(&read_event()?)?;

    let objects = FsObjectStore::new(&config.object_store_root);
    let connector = PgConnector::new(config.store_target(), EnvSecretStore);
    let dispatcher = HttpDispatcher::new(&config.endpoint())?;

    Ok(handle_event(
        &event,
        &objects,
        &connector,
        &dispatcher,
        &config.payload_statics(),
    ))
}

/// Reads the trigger event from the file given as first argument, or from stdin when it is absent or `-`.
fn read_event() -> Result<String> {
    match std::env::args().nth(1) {
        Some(path) if path != "-" => {
            std::fs::read_to_string(&path).with_context(|| format!("cannot read event file {path}"))
        }
        _ => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}
