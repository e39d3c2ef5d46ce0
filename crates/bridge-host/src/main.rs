//! Native bridge host binary
//!
//! Runs the bridge host over stdio: one JSON request per line on stdin, one
//! response per line on stdout. Logs go to stderr so stdout stays clean.
//!
//! ```bash
//! echo '{"id":"1","method":"triggerHaptic","payload":{"style":"light"}}' | bridge-host
//! ```

use std::io;
use std::sync::Arc;

use bridge_host::config::DEFAULT_CALLBACK_NAME;
use bridge_host::{
    CommandDispatcher, FnEmitter, HostConfig, HostPlatform, MessageRouter, ResponseEmitter,
    ScriptEmitter, StaticSessionContext,
};
use bridge_proto::CommandResponse;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Native bridge host over stdio.
#[derive(Parser, Debug)]
#[command(name = "bridge-host", version, about, long_about = None)]
struct Args {
    /// Monitoring session id reported by getMobileAgentContext.
    #[arg(long, env = "NATIVE_BRIDGE_SESSION_ID")]
    session_id: Option<String>,

    /// Write JavaScript delivery snippets instead of raw JSON responses.
    #[arg(long)]
    emit_script: bool,

    /// Content-side callback named in delivery snippets.
    #[arg(long, env = "NATIVE_BRIDGE_CALLBACK", default_value = DEFAULT_CALLBACK_NAME)]
    callback: String,

    /// Emit logs as JSON.
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bridge_host=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Queue one output line for the stdout writer.
fn send_line(tx: &mpsc::UnboundedSender<String>, line: String) -> bool {
    if tx.send(line).is_err() {
        warn!("stdout writer has stopped, response discarded");
        return false;
    }
    true
}

fn line_emitter(args: &Args, config: &HostConfig, tx: mpsc::UnboundedSender<String>) -> Arc<dyn ResponseEmitter> {
    if args.emit_script {
        return Arc::new(ScriptEmitter::new(config.callback_name.clone(), move |script| {
            send_line(&tx, script);
        }));
    }

    Arc::new(FnEmitter(move |response: CommandResponse| {
        match serde_json::to_string(&response) {
            Ok(line) => {
                send_line(&tx, line);
            }
            Err(e) => warn!(id = %response.id, error = %e, "failed to encode response"),
        }
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    info!("bridge-host starting");

    let platform = HostPlatform::system(StaticSessionContext::with_generated_uuid(
        args.session_id.clone(),
    ));
    let dispatcher = CommandDispatcher::with_builtin_handlers(&platform)?;
    info!(methods = ?dispatcher.methods(), "handlers registered");

    let config = HostConfig::new().with_callback_name(args.callback.clone());
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let router = MessageRouter::new(dispatcher, line_emitter(&args, &config, tx)).with_config(config);

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = rx.recv().await {
            stdout.write_all(line.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
        Ok::<_, io::Error>(())
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight = Vec::new();
    while let Some(line) = lines.next_line().await? {
        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }
        in_flight.retain(|task: &tokio::task::JoinHandle<()>| !task.is_finished());
        if let Some(task) = router.route_text(&line) {
            in_flight.push(task);
        }
    }

    for task in in_flight {
        if let Err(e) = task.await {
            warn!(error = %e, "dispatch task failed");
        }
    }

    // Dropping the router closes the response channel and ends the writer.
    drop(router);
    writer.await??;

    info!("bridge-host shutting down");
    Ok(())
}
