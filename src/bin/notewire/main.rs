//! notewire - play a short two-track demo through the output chain
//!
//! Run with: cargo run -- [config.toml]

mod demo;

use std::{env, path::PathBuf, str::FromStr, thread, time::Duration};

use color_eyre::eyre::{eyre, Result, WrapErr};
use log::{info, LevelFilter};
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
};

use notewire::{host::AudioHost, PlaybackConfig};

const NOTEWIRE_CONFIG: &str = "NOTEWIRE_CONFIG";
const DEFAULT_NOTEWIRE_CONFIG: &str = "notewire.toml";

const NOTEWIRE_LOG: &str = "NOTEWIRE_LOG";
const NOTEWIRE_LOG_CONFIG: &str = "NOTEWIRE_LOG_CONFIG";

fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging()?;

    let mut config = init_config()?;

    let host = AudioHost::open().wrap_err("failed to open audio output")?;
    config.sample_rate = host.sample_rate();

    let pending = notewire::init(&config).wrap_err("failed to start session")?;
    let session = pending.wait().wrap_err("failed to load instruments")?;
    let (engine, mut dispatcher) = session.into_parts();

    let _stream = host.play(engine).wrap_err("failed to start playback")?;

    info!("Playing demo... Press Ctrl+C to stop");
    demo::play(&mut dispatcher);

    // Let the last notes ring out through the reverb
    thread::sleep(Duration::from_secs(3));
    info!("Done");

    Ok(())
}

fn init_logging() -> Result<()> {
    if let Ok(path) = env::var(NOTEWIRE_LOG_CONFIG) {
        log4rs::init_file(&path, Default::default())
            .map_err(|err| eyre!("failed to init logging from {path}: {err}"))?;
        return Ok(());
    }

    let level = env::var(NOTEWIRE_LOG)
        .ok()
        .and_then(|level| LevelFilter::from_str(&level).ok())
        .unwrap_or(LevelFilter::Info);

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%H:%M:%S%.3f)} {h({l:5})} {t} - {m}{n}",
        )))
        .build();
    let log_config = log4rs::Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .wrap_err("invalid logging configuration")?;

    log4rs::init_config(log_config).wrap_err("failed to init logging")?;
    Ok(())
}

/// Config path from the first argument, then `NOTEWIRE_CONFIG`, then
/// `notewire.toml` if it exists. Defaults otherwise.
fn init_config() -> Result<PlaybackConfig> {
    let explicit = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::var_os(NOTEWIRE_CONFIG).map(PathBuf::from));

    let path = match explicit {
        Some(path) => path,
        None => {
            let fallback = PathBuf::from(DEFAULT_NOTEWIRE_CONFIG);
            if !fallback.exists() {
                info!("No configuration file, using defaults");
                return Ok(PlaybackConfig::default());
            }
            fallback
        }
    };

    info!("Loading configuration from {}", path.display());
    PlaybackConfig::from_file(&path)
        .wrap_err_with(|| format!("failed to load {}", path.display()))
}
