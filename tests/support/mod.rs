// ABOUTME: Shared test support: an in-memory daemon gateway double.
// ABOUTME: Records calls and simulates removal, failure, and state transitions.

use async_trait::async_trait;
use berth::gateway::{
    ActionVerb, ContainerStatus, DaemonGateway, GatewayError, PortMapping, Protocol,
    RawContainer, RawStats,
};
use berth::types::ContainerId;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// In-memory stand-in for the daemon, scripted per test.
#[derive(Default)]
pub struct MockGateway {
    pub containers: Mutex<Vec<RawContainer>>,
    /// Stats returned for running containers, keyed by id.
    pub stats: Mutex<HashMap<String, RawStats>>,
    /// Ids whose stats call fails with a daemon error.
    pub failing_stats: Mutex<HashSet<String>>,
    /// Ids whose action call fails with a daemon error.
    pub failing_actions: Mutex<HashSet<String>>,
    /// Ids removed from the daemon once an action lands (auto-remove).
    pub remove_on_action: Mutex<HashSet<String>>,
    /// Status applied to a container when an action lands.
    pub transition_on_action: Mutex<HashMap<String, ContainerStatus>>,
    /// Canned log lines, oldest first.
    pub log_lines: Mutex<Vec<String>>,

    pub recorded_log_tails: Mutex<Vec<u64>>,
    pub recorded_actions: Mutex<Vec<(String, ActionVerb)>>,
    pub recorded_inspects: Mutex<Vec<String>>,
    pub recorded_stats_calls: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn with_containers(containers: Vec<RawContainer>) -> Self {
        Self {
            containers: Mutex::new(containers),
            ..Default::default()
        }
    }

    pub fn set_stats(&self, id: &str, stats: RawStats) {
        self.stats.lock().unwrap().insert(id.to_string(), stats);
    }

    pub fn fail_stats(&self, id: &str) {
        self.failing_stats.lock().unwrap().insert(id.to_string());
    }

    pub fn fail_action(&self, id: &str) {
        self.failing_actions.lock().unwrap().insert(id.to_string());
    }

    pub fn remove_after_action(&self, id: &str) {
        self.remove_on_action.lock().unwrap().insert(id.to_string());
    }

    pub fn transition_after_action(&self, id: &str, status: ContainerStatus) {
        self.transition_on_action
            .lock()
            .unwrap()
            .insert(id.to_string(), status);
    }

    pub fn set_log_lines(&self, lines: &[&str]) {
        *self.log_lines.lock().unwrap() = lines.iter().map(|l| l.to_string()).collect();
    }

    fn find(&self, id: &ContainerId) -> Option<RawContainer> {
        self.containers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == *id || c.name == id.as_str())
            .cloned()
    }
}

#[async_trait]
impl DaemonGateway for MockGateway {
    async fn list_containers(&self) -> Result<Vec<RawContainer>, GatewayError> {
        Ok(self.containers.lock().unwrap().clone())
    }

    async fn inspect_container(&self, id: &ContainerId) -> Result<RawContainer, GatewayError> {
        self.recorded_inspects
            .lock()
            .unwrap()
            .push(id.to_string());
        self.find(id)
            .ok_or_else(|| GatewayError::NotFound(format!("no such container: {id}")))
    }

    async fn container_stats(
        &self,
        id: &ContainerId,
    ) -> Result<Option<RawStats>, GatewayError> {
        self.recorded_stats_calls
            .lock()
            .unwrap()
            .push(id.to_string());
        if self.failing_stats.lock().unwrap().contains(id.as_str()) {
            return Err(GatewayError::Daemon("stats probe failed".to_string()));
        }
        Ok(self.stats.lock().unwrap().get(id.as_str()).copied())
    }

    async fn container_logs(
        &self,
        id: &ContainerId,
        tail: u64,
    ) -> Result<Vec<String>, GatewayError> {
        self.recorded_log_tails.lock().unwrap().push(tail);
        if self.find(id).is_none() {
            return Err(GatewayError::NotFound(format!("no such container: {id}")));
        }
        let lines = self.log_lines.lock().unwrap();
        let skip = lines.len().saturating_sub(tail as usize);
        Ok(lines[skip..].to_vec())
    }

    async fn perform_action(
        &self,
        id: &ContainerId,
        verb: ActionVerb,
    ) -> Result<(), GatewayError> {
        self.recorded_actions
            .lock()
            .unwrap()
            .push((id.to_string(), verb));

        if self.failing_actions.lock().unwrap().contains(id.as_str()) {
            return Err(GatewayError::Daemon("action refused".to_string()));
        }
        if self.find(id).is_none() {
            return Err(GatewayError::NotFound(format!("no such container: {id}")));
        }

        if self.remove_on_action.lock().unwrap().contains(id.as_str()) {
            self.containers
                .lock()
                .unwrap()
                .retain(|c| c.id != *id && c.name != id.as_str());
            return Ok(());
        }
        if let Some(status) = self
            .transition_on_action
            .lock()
            .unwrap()
            .get(id.as_str())
            .copied()
        {
            let mut containers = self.containers.lock().unwrap();
            if let Some(c) = containers
                .iter_mut()
                .find(|c| c.id == *id || c.name == id.as_str())
            {
                c.status = status;
            }
        }
        Ok(())
    }
}

/// A running container with one published port, suitable for most tests.
pub fn running_container(id: &str, name: &str) -> RawContainer {
    RawContainer {
        id: ContainerId::new(id),
        name: name.to_string(),
        image: "nginx:latest".to_string(),
        status: ContainerStatus::Running,
        created: None,
        started_at: None,
        finished_at: None,
        ports: vec![PortMapping {
            container_port: 80,
            protocol: Protocol::Tcp,
            host_port: Some(8080),
        }],
    }
}

pub fn exited_container(id: &str, name: &str) -> RawContainer {
    RawContainer {
        status: ContainerStatus::Exited,
        ports: Vec::new(),
        ..running_container(id, name)
    }
}

pub fn sample_stats() -> RawStats {
    RawStats {
        cpu_total: 400,
        precpu_total: 200,
        system_cpu: 2000,
        pre_system_cpu: 1000,
        online_cpus: Some(2),
        percpu_samples: 0,
        memory_usage: Some(64 * 1024 * 1024),
    }
}
