use std::io::{self, Write};
use std::path::PathBuf;

use log::{debug, info};

use crate::engine::models::Release;
use crate::engine::state::{Phase, UpdateSession};
use crate::error::{Result, UpdateError};
use crate::install;
use crate::networking::ReleaseSource;
use crate::networking::download::{Downloader, artifact_path};
use crate::networking::progress::DownloadProgress;
use crate::prompt::{self, UserPrompt};
use crate::storage::{Settings, SettingsStore};
use crate::updater::{self, Decision};

pub mod models;
pub mod state;

/// Runs one check → confirm → install → persist pass.
pub struct UpdateEngine<S, P> {
    pub phase: Phase,
    source: S,
    prompt: P,
    downloader: Downloader,
    store: SettingsStore,
    install_dir: PathBuf,
}

impl<S: ReleaseSource, P: UserPrompt> UpdateEngine<S, P> {
    pub fn new(
        source: S,
        prompt: P,
        downloader: Downloader,
        store: SettingsStore,
        install_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            phase: Phase::Start,
            source,
            prompt,
            downloader,
            store,
            install_dir: install_dir.into(),
        }
    }

    /// Execute the run and write `settings` back with the resolved version.
    ///
    /// Any error returns before the config file is touched.
    pub async fn run(&mut self, mut settings: Settings) -> Result<UpdateSession> {
        println!("-> Update started...");
        self.transition(Phase::Start);

        println!("-> Getting latest version...");
        let latest = self.source.latest_release().await?;
        let mut session =
            UpdateSession::new(settings.current_version.clone(), updater::parse_version(&latest));
        self.transition(Phase::LatestFetched);

        session.decision = loop {
            match updater::decide(session.current_version.as_deref(), &latest) {
                Decision::UnknownNeedsInput => {
                    session.current_version = Some(prompt::current_version(&mut self.prompt)?);
                }
                decision => break decision,
            }
        };
        info!(
            "run: current={:?} latest={} decision={:?}",
            session.current_version, session.latest_version, session.decision
        );
        self.transition(Phase::Decided);

        match session.decision {
            Decision::UpdateAvailable => {
                println!("-> New version found! ({})", session.latest_version);
                if prompt::yes_no(&mut self.prompt, "-> Do you want to update?")? {
                    self.transition(Phase::Confirmed);
                    self.install_update(&latest).await?;
                    session.current_version = Some(session.latest_version.clone());
                    self.transition(Phase::Installed);
                    println!("-> Update complete!");
                } else {
                    self.transition(Phase::Cancelled);
                    println!("-> Update cancelled.");
                }
            }
            Decision::UpToDate => println!("-> You are on the latest version."),
            Decision::NoServerFiles => println!("-> No server files found."),
            // Resolved by the prompt loop above.
            Decision::UnknownNeedsInput => {}
        }

        println!("-> Saving config...");
        settings.current_version = session.current_version.clone();
        self.store.save(&settings)?;
        self.transition(Phase::Persisted);
        println!("-> Config saved!");

        Ok(session)
    }

    async fn install_update(&mut self, latest: &Release) -> Result<()> {
        let files = self.source.server_pack_files(latest).await?;
        let url = self.source.download_url(files.id);
        let dest = artifact_path(&self.install_dir, &files.file_name).ok_or_else(|| {
            UpdateError::malformed(&url, format!("unusable file name {:?}", files.file_name))
        })?;

        let mut progress = DownloadProgress::new(files.file_name.clone());
        self.downloader
            .fetch(&url, &dest, |so_far, _chunk, total| {
                if let Some(line) = progress.update(so_far, total) {
                    print!("{line}\r");
                    if let Err(err) = io::stdout().flush() {
                        debug!("run: progress flush failed: {err}");
                    }
                }
            })
            .await?;
        println!();
        info!(
            "run: downloaded {} ({} of {:?} bytes, {})",
            dest.display(),
            progress.transferred(),
            progress.total(),
            progress.stage().label()
        );

        println!("-> Installing update...");
        for existing in install::discover_installations(&self.install_dir)? {
            println!("-> Found existing installation: {}", existing.display());
            info!("run: existing installation at {}", existing.display());
        }
        install::install(&dest, &self.install_dir)?;
        println!("-> Update installed!");
        Ok(())
    }

    fn transition(&mut self, next: Phase) {
        debug!("run: {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    #[cfg(test)]
    fn prompt(&self) -> &P {
        &self.prompt
    }
}
