//! WordSpeaker application binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Initialize tracing (stderr, so the REPL on stdout stays readable)
//! 3. Build the speech gateway, ticker and session
//! 4. Run the event loop: stdin commands, fired timers, speech results

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use wordspeaker_app::{App, CliArgs, Flow};
use wordspeaker_core::config::WordSpeakerConfig;
use wordspeaker_core::types::VoiceId;
use wordspeaker_playback::TokioTicker;
use wordspeaker_speech::{engine_for, SpeechGateway};

fn init_tracing(cli_level: Option<String>, config_level: &str) {
    let filter = match cli_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config_level)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn prompt(out: &mut impl Write) -> std::io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config. Loaded before tracing exists, so problems are logged after init.
    let config_file = args.resolve_config_path();
    let loaded = WordSpeakerConfig::load(&config_file);
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    args.apply(&mut config)?;

    init_tracing(args.resolve_log_level(), &config.general.log_level);
    tracing::info!("Starting WordSpeaker v{}", env!("CARGO_PKG_VERSION"));
    match loaded {
        Ok(_) => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Err(e) if config_file.exists() => {
            tracing::warn!(path = %config_file.display(), error = %e, "Invalid config file, using defaults")
        }
        Err(_) => tracing::debug!(path = %config_file.display(), "No config file, using defaults"),
    }

    // Speech.
    let engine = engine_for(config.speech.engine, config.speech.binary.as_deref());
    let (gateway, mut speech_events) =
        SpeechGateway::new(engine, config.speech.voice.clone().map(VoiceId));
    tracing::info!(engine = gateway.engine_name(), "Speech gateway ready");

    // Session.
    let (ticker, mut ticks) = TokioTicker::new();
    let mut app = App::new(&config, Arc::new(gateway), Box::new(ticker));

    let mut stdout = std::io::stdout();
    writeln!(stdout, "WordSpeaker {}. Type 'help' for commands.", env!("CARGO_PKG_VERSION"))?;
    if let Some(ref path) = args.import {
        app.import(path, &mut stdout)?;
    }
    app.write_notices(&mut stdout)?;
    prompt(&mut stdout)?;

    // === Event loop ===

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    app.shutdown();
                    break;
                };
                if app.handle_line(&line, &mut stdout).await? == Flow::Quit {
                    break;
                }
                app.write_notices(&mut stdout)?;
                prompt(&mut stdout)?;
            }
            Some(generation) = ticks.recv() => {
                if let Some(progress) = app.on_timer(generation) {
                    writeln!(stdout, "\r{}", progress)?;
                    prompt(&mut stdout)?;
                }
                app.write_notices(&mut stdout)?;
            }
            Some(event) = speech_events.recv() => {
                app.on_speech_event(&event);
                app.write_notices(&mut stdout)?;
            }
        }
    }

    writeln!(stdout)?;
    Ok(())
}
