use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

mod engine;
mod env;
mod error;
mod install;
mod logging;
mod networking;
mod prompt;
mod storage;
mod updater;
mod util;

#[cfg(test)]
mod test_support;

use engine::UpdateEngine;
use networking::download::Downloader;
use networking::{RegistryClient, RegistryQuery};
use prompt::TerminalPrompt;
use storage::SettingsStore;

#[derive(Parser, Debug)]
#[command(
    name = "serverpack-updater",
    author,
    version,
    about = "Checks the registry for a newer server pack and installs it over the local server"
)]
struct Cli {
    /// Config file holding the registry query and the installed version.
    #[arg(long, default_value = env::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory the server pack is extracted into.
    #[arg(long, default_value = ".")]
    install_dir: PathBuf,

    /// Directory receiving one log file per day.
    #[arg(long, default_value = env::DEFAULT_LOGS_DIR)]
    logs_dir: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    println!(
        "-> Server pack updater v{} initializing...",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(err) = env::ensure_dirs(&cli.logs_dir, &cli.install_dir) {
        eprintln!("-> Unable to prepare directories: {err}");
        return ExitCode::FAILURE;
    }
    match logging::init(&cli.logs_dir) {
        Ok(path) => info!("logging to {}", path.display()),
        Err(err) => eprintln!("-> Logging disabled: {err}"),
    }

    let store = SettingsStore::new(&cli.config);
    let settings = match store.load_or_create() {
        Ok(settings) => settings,
        Err(err) => return fail(err),
    };
    println!("{}", "-".repeat(40));

    let registry = RegistryClient::new(RegistryQuery::from(&settings));
    let downloader = Downloader::new(registry.client().clone());
    let mut engine = UpdateEngine::new(
        registry,
        TerminalPrompt,
        downloader,
        store,
        &cli.install_dir,
    );

    match engine.run(settings).await {
        Ok(session) => {
            info!("run finished: {:?}", session);
            ExitCode::SUCCESS
        }
        Err(err) => fail(err),
    }
}

fn fail(err: error::UpdateError) -> ExitCode {
    error!("run aborted: {err}");
    eprintln!("-> {err}");
    ExitCode::from(err.exit_code())
}
