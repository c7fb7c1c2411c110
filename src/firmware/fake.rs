//! Scripted in-memory firmware used by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::FirmwareTransport;
use crate::errors::{FanControlError, Result};

#[derive(Default)]
struct FakeState {
    calls: Vec<(String, Vec<u64>)>,
    responses: HashMap<String, u64>,
    failures: HashMap<String, String>,
}

/// Records every call; clones share the same log so a test can keep a
/// handle after boxing one into a gateway.
#[derive(Clone, Default)]
pub struct FakeFirmware {
    state: Arc<Mutex<FakeState>>,
}

impl FakeFirmware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `method` return `value` from now on.
    pub fn respond(&self, method: &str, value: u64) {
        self.state.lock().unwrap().responses.insert(method.to_string(), value);
    }

    /// Make `method` fail with `status` from now on.
    pub fn fail(&self, method: &str, status: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(method.to_string(), status.to_string());
    }

    pub fn calls(&self) -> Vec<(String, Vec<u64>)> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<Vec<u64>> {
        self.calls()
            .into_iter()
            .filter(|(name, _)| name == method)
            .map(|(_, args)| args)
            .collect()
    }

    pub fn clear(&self) {
        self.state.lock().unwrap().calls.clear();
    }
}

impl FirmwareTransport for FakeFirmware {
    fn evaluate(&mut self, method: &str, args: &[u64]) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((method.to_string(), args.to_vec()));
        if let Some(status) = state.failures.get(method) {
            return Err(FanControlError::Firmware {
                method: method.to_string(),
                status: status.clone(),
            });
        }
        Ok(state.responses.get(method).copied().unwrap_or(0))
    }
}
