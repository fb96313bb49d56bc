use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use tokio::net::UnixStream;
use vagrancy::client::build_client::run_session;

#[derive(Parser)]
#[command(name = "vagrancy-client")]
#[command(about = "Triggers a build cycle on a running vagrancy server")]
struct Args {
    /// Socket the server listens on.
    #[arg(long, default_value = "/tmp/vagrancy/vagrancy.sock")]
    socket_path: PathBuf,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    let args = Args::parse();

    let stream = match UnixStream::connect(&args.socket_path).await {
        Ok(stream) => stream,
        Err(e) => {
            error!("Unable to connect to {}: {}", args.socket_path.display(), e);
            std::process::exit(1);
        }
    };
    info!("CONNECTED TO: {}", args.socket_path.display());

    match run_session(stream).await {
        Ok(report) => {
            info!("Connection closed");
            match serde_json::to_string(&report.images) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("Failed to serialize image list: {}", e),
            }
        }
        Err(e) => {
            error!("Session failed: {}", e);
            std::process::exit(1);
        }
    }
}
