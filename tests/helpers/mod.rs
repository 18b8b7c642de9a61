//! Test doubles for the container client, the CI environment and the console

#![allow(dead_code)]

use async_trait::async_trait;
use bake_monitor::models::container_group::ContainerGroup;
use bake_monitor::services::aci::{AciError, ContainerClient};
use bake_monitor::services::github::CiEnvironment;
use std::collections::{HashMap, VecDeque};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

pub const OUTPUT_PATH: &str = "/github/output";
pub const SUMMARY_PATH: &str = "/github/step_summary";

/// One scripted answer to a status poll.
#[derive(Debug, Clone)]
pub enum Poll {
    /// The group descriptor and the full log text at that moment
    Group(ContainerGroup, String),
    /// A transport failure
    Error,
}

pub fn group(group: ContainerGroup, logs: &str) -> Poll {
    Poll::Group(group, logs.to_string())
}

/// Container client that replays a script per image. The last entry of a
/// script repeats forever.
#[derive(Default)]
pub struct ScriptedClient {
    scripts: Mutex<HashMap<String, VecDeque<Poll>>>,
    logs: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, image: &str, polls: Vec<Poll>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(image.to_string(), polls.into_iter().collect());
        self
    }

    /// Images in the order they were polled.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, image: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == image).count()
    }
}

#[async_trait]
impl ContainerClient for ScriptedClient {
    async fn get_container_group(
        &self,
        _resource_group: &str,
        name: &str,
    ) -> Result<ContainerGroup, AciError> {
        self.calls.lock().unwrap().push(name.to_string());

        let poll = {
            let mut scripts = self.scripts.lock().unwrap();
            let script = scripts.get_mut(name).ok_or_else(|| AciError::Status {
                status: 404,
                body: format!("container group {} not found", name),
            })?;
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            }
        };

        match poll {
            Some(Poll::Group(group, logs)) => {
                self.logs.lock().unwrap().insert(name.to_string(), logs);
                Ok(group)
            }
            Some(Poll::Error) | None => Err(AciError::Status {
                status: 503,
                body: "Service Unavailable".to_string(),
            }),
        }
    }

    async fn list_logs(
        &self,
        _resource_group: &str,
        container_group: &str,
        _container: &str,
    ) -> Result<String, AciError> {
        Ok(self
            .logs
            .lock()
            .unwrap()
            .get(container_group)
            .cloned()
            .unwrap_or_default())
    }
}

/// CI environment backed by a map; appended files are kept in memory.
#[derive(Default)]
pub struct MemoryEnv {
    vars: HashMap<String, String>,
    files: Mutex<HashMap<String, String>>,
}

impl MemoryEnv {
    /// An interactive shell: no CI flags, no sinks.
    pub fn local() -> Self {
        Self::default()
    }

    /// A GitHub Actions step with output and summary files.
    pub fn github() -> Self {
        let vars = [
            ("GITHUB_ACTIONS", "true"),
            ("GITHUB_OUTPUT", OUTPUT_PATH),
            ("GITHUB_STEP_SUMMARY", SUMMARY_PATH),
        ];
        Self {
            vars: vars
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn output(&self) -> String {
        self.file(OUTPUT_PATH)
    }

    pub fn summary(&self) -> String {
        self.file(SUMMARY_PATH)
    }

    fn file(&self, path: &str) -> String {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or_default()
    }
}

impl CiEnvironment for MemoryEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn append_file(&self, path: &str, text: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_str(text);
        Ok(())
    }
}

/// Console writer whose contents stay readable after it is handed off.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Console writer that rejects its first `failures` writes with a broken pipe.
pub struct FailingBuffer {
    inner: SharedBuffer,
    failures: usize,
}

impl FailingBuffer {
    pub fn new(inner: SharedBuffer, failures: usize) -> Self {
        Self { inner, failures }
    }
}

impl Write for FailingBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "console closed"));
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
