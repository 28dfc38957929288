//! Fakes for exercising the updater without a network or `unzip`.

use super::installer::Installer;
use super::transport::{HttpResponse, Transport};
use crate::error::InstallError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn release_json(tag: &str, asset_urls: &[&str]) -> String {
    let assets: Vec<serde_json::Value> = asset_urls
        .iter()
        .map(|u| serde_json::json!({ "browser_download_url": u }))
        .collect();
    serde_json::json!({ "tag_name": tag, "assets": assets }).to_string()
}

/// Once filled in, the flag is raised as soon as the URL has been served.
pub type CancelHook = Arc<Mutex<Option<(String, Arc<AtomicBool>)>>>;

/// Answers each URL with a canned response and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: HashMap<String, Result<HttpResponse, String>>,
    requests: Arc<Mutex<Vec<String>>>,
    cancel_hook: CancelHook,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Ok(HttpResponse { status: 200, body: body.as_bytes().to_vec() }),
        );
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.responses
            .insert(url.to_string(), Ok(HttpResponse { status, body: Vec::new() }));
        self
    }

    pub fn unreachable(mut self, url: &str, reason: &str) -> Self {
        self.responses.insert(url.to_string(), Err(reason.to_string()));
        self
    }

    pub fn requests(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.requests)
    }

    pub fn cancel_hook(&self) -> CancelHook {
        Arc::clone(&self.cancel_hook)
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &str, _timeout: Duration) -> Result<HttpResponse, String> {
        self.requests.lock().unwrap().push(url.to_string());
        let response = self
            .responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(format!("no scripted response for {url}")));
        if let Some((hook_url, flag)) = self.cancel_hook.lock().unwrap().as_ref() {
            if hook_url == url {
                flag.store(true, Ordering::SeqCst);
            }
        }
        response
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackCall {
    pub archive: PathBuf,
    pub dest: PathBuf,
    /// Archive bytes as they were on disk when unpack ran.
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingInstaller {
    calls: Arc<Mutex<Vec<UnpackCall>>>,
}

impl RecordingInstaller {
    pub fn calls(&self) -> Vec<UnpackCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Installer for RecordingInstaller {
    fn unpack(&self, archive: &Path, dest: &Path) -> Result<(), InstallError> {
        let contents = std::fs::read(archive).unwrap_or_default();
        self.calls.lock().unwrap().push(UnpackCall {
            archive: archive.to_path_buf(),
            dest: dest.to_path_buf(),
            contents,
        });
        Ok(())
    }
}

pub struct FailingInstaller;

impl Installer for FailingInstaller {
    fn unpack(&self, _archive: &Path, _dest: &Path) -> Result<(), InstallError> {
        Err(InstallError::Status {
            program: "unzip".to_string(),
            status: "exit status: 9".to_string(),
        })
    }
}
