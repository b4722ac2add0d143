use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cdecl_indexer::{ServerConfig, Session};

#[derive(Parser, Debug)]
#[command(name = "cdecl-indexer", version, about)]
struct Args {
    /// TCP port to listen on.
    #[arg(long, short)]
    port: Option<u16>,

    /// Root of the source tree to index. Defaults to the current directory.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Command that runs a build for the `Compile` request.
    #[arg(long)]
    build_command: Option<String>,

    /// Log file the build command writes, relative to the root.
    #[arg(long)]
    build_log: Option<String>,

    #[arg(long, short)]
    verbose: bool,

    #[arg(long)]
    log_file: Option<String>,
}

fn default_log_path() -> std::path::PathBuf {
    let dir = dirs_or_tmp();
    dir.join("cdecl-indexer.log")
}

fn dirs_or_tmp() -> std::path::PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        let dir = std::path::PathBuf::from(home).join(".cdecl-indexer");
        if std::fs::create_dir_all(&dir).is_ok() {
            return dir;
        }
    }
    std::env::temp_dir()
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let stderr_filter = if args.verbose {
        EnvFilter::new("cdecl_indexer=debug")
    } else {
        EnvFilter::new("cdecl_indexer=info")
    };

    let file_filter = if args.verbose {
        EnvFilter::new("cdecl_indexer=debug")
    } else {
        // Keep baseline lifecycle logs without the heavy debug stream by default.
        EnvFilter::new("cdecl_indexer=info")
    };

    let log_path = args
        .log_file
        .as_ref()
        .map(std::path::PathBuf::from)
        .unwrap_or_else(default_log_path);

    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or(std::path::Path::new(".")),
        log_path
            .file_name()
            .unwrap_or(std::ffi::OsStr::new("cdecl-indexer.log")),
    );

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(false)
        .with_filter(file_filter);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_filter(stderr_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();

    info!("Starting cdecl-indexer v{}", env!("CARGO_PKG_VERSION"));
    info!("Log file: {}", log_path.display());

    let mut config = ServerConfig::default();
    if let Some(root) = args.root {
        config.root = root;
    }
    let root = config.root.clone();
    config.load_overrides(&root);
    // Command-line flags win over the config file.
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(build_command) = args.build_command {
        config.build_command = build_command;
    }
    if let Some(build_log) = args.build_log {
        config.log_file = build_log;
    }
    config.normalize();

    let address = format!("127.0.0.1:{}", config.port);
    let listener = match TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Could not bind {address}: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!("Listening on {address}");

    // One editor drives one server; accept a single client and serve it
    // until it exits.
    let (stream, peer) = match listener.accept().await {
        Ok(accepted) => accepted,
        Err(e) => {
            error!("Could not accept a client: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!("Client connected from {peer}");

    if let Err(e) = Session::new(stream, config).run().await {
        error!("Session ended with an error: {e}");
        return ExitCode::FAILURE;
    }

    info!("cdecl-indexer stopped");
    ExitCode::SUCCESS
}
