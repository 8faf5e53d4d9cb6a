//! In-memory stand-in for the file-manager server.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use remotefm::base64::decode_basic_auth;
use remotefm::{
    Ack, ActionRequest, FileEntry, FileManager, FmError, MemoryStore, Prompter, RemoteApi,
    Result, Session, UploadFile,
};

pub const USER: &str = "admin";
pub const PASSWORD: &str = "secret";

/// A request as seen by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login,
    List(String),
    Action(ActionRequest),
    Upload { dest: String, name: String },
    Download(String),
}

/// Canned failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fail {
    Unauthorized,
    Server,
}

impl Fail {
    fn error(self) -> FmError {
        match self {
            Fail::Unauthorized => FmError::Unauthorized,
            Fail::Server => FmError::OperationFailed {
                status: 500,
                message: "Internal Server Error".to_string(),
            },
        }
    }
}

#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    accepted: Mutex<Option<(String, String)>>,
    listings: Mutex<HashMap<String, Vec<FileEntry>>>,
    list_failures: Mutex<HashMap<String, Fail>>,
    action_failure: Mutex<Option<Fail>>,
    upload_failures: Mutex<HashMap<String, Fail>>,
    downloads: Mutex<HashMap<String, Vec<u8>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl FakeApi {
    /// Server accepting `admin`/`secret` with an empty root.
    pub fn new() -> Arc<Self> {
        let api = Self::default();
        *api.accepted.lock() = Some((USER.to_string(), PASSWORD.to_string()));
        api.listings.lock().insert("/".to_string(), Vec::new());
        Arc::new(api)
    }

    pub fn set_listing(&self, path: &str, entries: Vec<FileEntry>) {
        self.listings.lock().insert(path.to_string(), entries);
    }

    pub fn fail_list(&self, path: &str, fail: Fail) {
        self.list_failures.lock().insert(path.to_string(), fail);
    }

    pub fn fail_actions(&self, fail: Option<Fail>) {
        *self.action_failure.lock() = fail;
    }

    pub fn fail_upload(&self, name: &str, fail: Fail) {
        self.upload_failures.lock().insert(name.to_string(), fail);
    }

    pub fn set_download(&self, path: &str, bytes: &[u8]) {
        self.downloads.lock().insert(path.to_string(), bytes.to_vec());
    }

    /// Revoke every credential, as if the password changed server-side.
    pub fn revoke(&self) {
        *self.accepted.lock() = None;
    }

    /// Hold listing requests for `path` until the returned handle is notified.
    pub fn gate_list(&self, path: &str) -> Arc<Notify> {
        self.gate(format!("list:{}", path))
    }

    /// Hold action requests on `source` until the returned handle is notified.
    pub fn gate_action(&self, source: &str) -> Arc<Notify> {
        self.gate(format!("action:{}", source))
    }

    /// Hold the upload of `name` until the returned handle is notified.
    pub fn gate_upload(&self, name: &str) -> Arc<Notify> {
        self.gate(format!("upload:{}", name))
    }

    fn gate(&self, key: String) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().insert(key, notify.clone());
        notify
    }

    // Gates are single-use.
    async fn pass_gate(&self, key: &str) {
        let gate = self.gates.lock().remove(key);
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn list_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::List(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn upload_calls(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Upload { dest, name } => Some((dest, name)),
                _ => None,
            })
            .collect()
    }

    pub fn action_calls(&self) -> Vec<ActionRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Action(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn check(&self, auth: &str) -> Result<()> {
        let presented = decode_basic_auth(auth);
        if presented.is_some() && presented == *self.accepted.lock() {
            Ok(())
        } else {
            Err(FmError::Unauthorized)
        }
    }
}

#[async_trait]
impl RemoteApi for FakeApi {
    async fn login(&self, auth: &str) -> Result<()> {
        self.record(Call::Login);
        self.check(auth).map_err(|_| FmError::InvalidCredentials)
    }

    async fn list(&self, auth: &str, path: &str) -> Result<Vec<FileEntry>> {
        self.record(Call::List(path.to_string()));
        self.pass_gate(&format!("list:{}", path)).await;
        self.check(auth)?;
        if let Some(fail) = self.list_failures.lock().get(path) {
            return Err(fail.error());
        }
        self.listings
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| FmError::OperationFailed {
                status: 404,
                message: "Directory not found".to_string(),
            })
    }

    async fn action(&self, auth: &str, request: &ActionRequest) -> Result<Ack> {
        self.record(Call::Action(request.clone()));
        self.pass_gate(&format!("action:{}", request.source_path)).await;
        self.check(auth)?;
        if let Some(fail) = *self.action_failure.lock() {
            return Err(fail.error());
        }
        Ok(Ack {
            status: Some(request.action.to_string()),
            info: None,
        })
    }

    async fn upload(&self, auth: &str, dest_dir: &str, file: &UploadFile) -> Result<Ack> {
        self.record(Call::Upload {
            dest: dest_dir.to_string(),
            name: file.name.clone(),
        });
        self.pass_gate(&format!("upload:{}", file.name)).await;
        self.check(auth)?;
        if let Some(fail) = self.upload_failures.lock().get(&file.name) {
            return Err(fail.error());
        }
        Ok(Ack {
            status: None,
            info: Some("saved".to_string()),
        })
    }

    async fn download(&self, auth: &str, path: &str) -> Result<Vec<u8>> {
        self.record(Call::Download(path.to_string()));
        self.check(auth)?;
        self.downloads
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| FmError::OperationFailed {
                status: 404,
                message: "File not found".to_string(),
            })
    }
}

/// Scripted answers for confirmation and naming prompts.
pub struct Scripted {
    pub confirm: bool,
    pub name: Option<String>,
    pub asked: Mutex<Vec<String>>,
}

impl Scripted {
    pub fn confirm(answer: bool) -> Self {
        Self {
            confirm: answer,
            name: None,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn name(name: Option<&str>) -> Self {
        Self {
            confirm: false,
            name: name.map(str::to_string),
            asked: Mutex::new(Vec::new()),
        }
    }
}

impl Prompter for Scripted {
    fn confirm(&self, question: &str) -> bool {
        self.asked.lock().push(question.to_string());
        self.confirm
    }

    fn folder_name(&self) -> Option<String> {
        self.asked.lock().push("folder name".to_string());
        self.name.clone()
    }
}

pub fn file(dir: &str, name: &str, size: u64) -> FileEntry {
    FileEntry {
        name: name.to_string(),
        path: join(dir, name),
        is_dir: false,
        size,
    }
}

pub fn dir(parent: &str, name: &str) -> FileEntry {
    FileEntry {
        name: name.to_string(),
        path: join(parent, name),
        is_dir: true,
        size: 0,
    }
}

fn join(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}

/// A logged-out manager over `api` with an in-memory credential store.
pub fn manager(api: &Arc<FakeApi>) -> (FileManager, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let session = Arc::new(Session::restore(store.clone()));
    (FileManager::new(api.clone(), session), store)
}

/// A manager that has logged in and shows the root.
pub async fn logged_in(api: &Arc<FakeApi>) -> (FileManager, Arc<MemoryStore>) {
    let (manager, store) = manager(api);
    manager.login(USER, PASSWORD).await.unwrap();
    api.clear_calls();
    (manager, store)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("remotefm=debug")
        .with_test_writer()
        .try_init();
}
