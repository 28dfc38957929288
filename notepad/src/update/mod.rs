//! Self-update check against the GitHub release feed.
//!
//! One check walks `Idle -> Checking -> {UpToDate, UpdateAvailable}` and,
//! when an update is available, `Downloading -> {Installed, Failed}`.
//!
//! The installed version is compared to the feed's `tag_name` by plain
//! string inequality, so any different tag (a downgrade or a malformed
//! string included) is treated as an update. The archive is unpacked
//! straight over the installation directory with no rollback: if unpacking
//! fails half way, or the process dies mid-install, the installation is
//! left partially overwritten.

pub mod installer;
pub mod task;
pub mod transport;

#[cfg(test)]
pub mod testing;

use crate::error::{NetworkError, UpdateError};
use installer::Installer;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use transport::{HttpResponse, Transport};

pub use installer::UnzipInstaller;
pub use task::UpdateTask;
pub use transport::UreqTransport;

/// Version of this build.
pub const CURRENT_VERSION: &str = "1.0.0";

pub const RELEASES_URL: &str =
    "https://api.github.com/repos/THErealguy11/notepad-/releases/latest";

const ARCHIVE_NAME: &str = "update.zip";
const METADATA_TIMEOUT: Duration = Duration::from_secs(30);
const ARCHIVE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateConfig {
    pub feed_url: String,
    pub current_version: String,
    /// Directory the archive is unpacked over.
    pub install_dir: PathBuf,
    pub archive_name: String,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self::from_current_dir()
    }
}

impl UpdateConfig {
    /// Hard-coded feed and version, installing over the working directory.
    pub fn from_current_dir() -> Self {
        let install_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::for_dir(install_dir)
    }

    pub fn for_dir(install_dir: PathBuf) -> Self {
        Self {
            feed_url: RELEASES_URL.to_string(),
            current_version: CURRENT_VERSION.to_string(),
            install_dir,
            archive_name: ARCHIVE_NAME.to_string(),
        }
    }

    pub fn archive_path(&self) -> PathBuf {
        self.install_dir.join(&self.archive_name)
    }

    pub fn user_agent(&self) -> String {
        format!("notepad/{}", self.current_version)
    }
}

#[derive(Debug, Deserialize)]
struct ReleaseInfo {
    tag_name: String,
    #[serde(default)]
    assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Deserialize)]
struct ReleaseAsset {
    browser_download_url: String,
}

/// The latest release and the asset that would be installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    pub version: String,
    pub download_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    UpToDate,
    UpdateAvailable(ReleaseDescriptor),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    UpToDate,
    /// Files were placed; the app must be restarted to use them.
    Installed { version: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateState {
    Idle,
    Checking,
    UpToDate,
    UpdateAvailable(String),
    Downloading,
    Installed,
    Failed(String),
}

impl UpdateState {
    /// Short status-bar text for this state.
    pub fn status_text(&self) -> String {
        match self {
            UpdateState::Idle => String::new(),
            UpdateState::Checking => "checking for updates...".to_string(),
            UpdateState::UpToDate => "up to date".to_string(),
            UpdateState::UpdateAvailable(v) => format!("update {v} available"),
            UpdateState::Downloading => "downloading update...".to_string(),
            UpdateState::Installed => "update installed".to_string(),
            UpdateState::Failed(_) => "update failed".to_string(),
        }
    }
}

/// Any tag other than the running version counts as an update.
pub fn is_newer_version_available(latest: &str, current: &str) -> bool {
    latest != current
}

pub struct Updater<T, I> {
    config: UpdateConfig,
    transport: T,
    installer: I,
    state: UpdateState,
    cancel: Arc<AtomicBool>,
    observer: Option<StateObserver>,
}

/// Called with every state the updater enters.
pub type StateObserver = Box<dyn Fn(&UpdateState) + Send>;

/// The updater the application runs.
pub type SystemUpdater = Updater<UreqTransport, UnzipInstaller>;

impl SystemUpdater {
    pub fn system(config: UpdateConfig) -> Self {
        let transport = UreqTransport::new(config.user_agent());
        Updater::new(config, transport, UnzipInstaller::default())
    }
}

impl<T: Transport, I: Installer> Updater<T, I> {
    pub fn new(config: UpdateConfig, transport: T, installer: I) -> Self {
        Self {
            config,
            transport,
            installer,
            state: UpdateState::Idle,
            cancel: Arc::new(AtomicBool::new(false)),
            observer: None,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &UpdateState {
        &self.state
    }

    pub fn set_observer(&mut self, observer: StateObserver) {
        self.observer = Some(observer);
    }

    /// Flag that, once set, stops the check before its next step.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Check, and install if the feed names a different version.
    pub fn check_for_update(&mut self) -> Result<UpdateOutcome, UpdateError> {
        match self.check()? {
            Availability::UpToDate => Ok(UpdateOutcome::UpToDate),
            Availability::UpdateAvailable(release) => {
                self.install(&release)?;
                Ok(UpdateOutcome::Installed { version: release.version })
            }
        }
    }

    /// Fetch the release metadata and compare versions.
    pub fn check(&mut self) -> Result<Availability, UpdateError> {
        self.transition(UpdateState::Checking);
        let result = self.fetch_availability();
        match &result {
            Ok(Availability::UpToDate) => self.transition(UpdateState::UpToDate),
            Ok(Availability::UpdateAvailable(release)) => {
                self.transition(UpdateState::UpdateAvailable(release.version.clone()))
            }
            Err(e) => self.transition(UpdateState::Failed(e.to_string())),
        }
        result
    }

    /// Download `release` and unpack it over the installation directory.
    pub fn install(&mut self, release: &ReleaseDescriptor) -> Result<(), UpdateError> {
        let result = self.download_and_unpack(release);
        match &result {
            Ok(()) => self.transition(UpdateState::Installed),
            Err(e) => self.transition(UpdateState::Failed(e.to_string())),
        }
        result
    }

    fn fetch_availability(&self) -> Result<Availability, UpdateError> {
        self.ensure_not_cancelled()?;
        let response = self
            .transport
            .get(&self.config.feed_url, METADATA_TIMEOUT)
            .map_err(NetworkError::FetchFailed)?;
        let body = success_body(response).map_err(NetworkError::FetchFailed)?;
        let info: ReleaseInfo = serde_json::from_slice(&body)?;

        if !is_newer_version_available(&info.tag_name, &self.config.current_version) {
            return Ok(Availability::UpToDate);
        }

        let asset = info
            .assets
            .into_iter()
            .next()
            .ok_or_else(|| UpdateError::NoAssets(info.tag_name.clone()))?;
        Ok(Availability::UpdateAvailable(ReleaseDescriptor {
            version: info.tag_name,
            download_url: asset.browser_download_url,
        }))
    }

    fn download_and_unpack(&mut self, release: &ReleaseDescriptor) -> Result<(), UpdateError> {
        self.ensure_not_cancelled()?;
        self.transition(UpdateState::Downloading);

        let response = self
            .transport
            .get(&release.download_url, ARCHIVE_TIMEOUT)
            .map_err(NetworkError::DownloadFailed)?;
        let body = success_body(response).map_err(NetworkError::DownloadFailed)?;

        let archive = self.config.archive_path();
        if let Err(e) = std::fs::write(&archive, &body) {
            remove_archive(&archive);
            return Err(e.into());
        }
        log::info!("downloaded {} ({} bytes)", archive.display(), body.len());

        let result = match self.ensure_not_cancelled() {
            Ok(()) => self
                .installer
                .unpack(&archive, &self.config.install_dir)
                .map_err(UpdateError::from),
            Err(e) => Err(e),
        };

        remove_archive(&archive);
        result
    }

    fn ensure_not_cancelled(&self) -> Result<(), UpdateError> {
        if self.cancel.load(Ordering::SeqCst) {
            Err(UpdateError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn transition(&mut self, next: UpdateState) {
        log::debug!("update state {:?} -> {:?}", self.state, next);
        if let Some(observer) = &self.observer {
            observer(&next);
        }
        self.state = next;
    }
}

fn remove_archive(archive: &std::path::Path) {
    match std::fs::remove_file(archive) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("could not remove {}: {}", archive.display(), e),
    }
}

fn success_body(response: HttpResponse) -> Result<Vec<u8>, String> {
    if response.is_success() {
        Ok(response.body)
    } else {
        Err(format!("HTTP status {}", response.status))
    }
}
