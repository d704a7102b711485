// Mock manufacturing API for testing - canned answers, every call recorded

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::api::client::ManufacturingApi;
use crate::api::errors::ApiError;
use crate::api::types::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    WorkOrder(String),
    Serial(String),
    CurrentWorkOrder(String),
}

#[derive(Debug, Default)]
struct MockApiState {
    work_orders: HashMap<String, Result<WorkOrderInfo, ApiError>>,
    serials: HashMap<String, Result<SerialInfo, ApiError>>,
    /// Answers for successive monitor checks; the last one repeats
    monitor: VecDeque<Result<String, ApiError>>,
    calls: Vec<ApiCall>,
}

/// Clones share state, so a test keeps one handle and gives another away
#[derive(Debug, Clone, Default)]
pub struct MockManufacturingApi {
    state: Arc<Mutex<MockApiState>>,
}

impl MockManufacturingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_work_order(self, id: &str, press: &str, rmat: &str) -> Self {
        self.state.lock().unwrap().work_orders.insert(
            id.to_string(),
            Ok(WorkOrderInfo {
                press: press.to_string(),
                raw_material: rmat.to_string(),
            }),
        );
        self
    }

    pub fn with_work_order_error(self, id: &str, error: ApiError) -> Self {
        self.state
            .lock()
            .unwrap()
            .work_orders
            .insert(id.to_string(), Err(error));
        self
    }

    pub fn with_serial(self, serial: &str, item_number: &str) -> Self {
        self.state.lock().unwrap().serials.insert(
            serial.to_string(),
            Ok(SerialInfo {
                item_number: item_number.to_string(),
            }),
        );
        self
    }

    pub fn with_serial_error(self, serial: &str, error: ApiError) -> Self {
        self.state
            .lock()
            .unwrap()
            .serials
            .insert(serial.to_string(), Err(error));
        self
    }

    pub fn with_monitor(self, answer: Result<&str, ApiError>) -> Self {
        self.state
            .lock()
            .unwrap()
            .monitor
            .push_back(answer.map(str::to_string));
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn monitor_checks(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, ApiCall::CurrentWorkOrder(_)))
            .count()
    }
}

pub fn transport_failure() -> ApiError {
    ApiError::Transport {
        url: "http://mock/".to_string(),
        message: "connection refused".to_string(),
    }
}

#[async_trait]
impl ManufacturingApi for MockManufacturingApi {
    async fn work_order(&self, work_order: &str) -> Result<WorkOrderInfo, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ApiCall::WorkOrder(work_order.to_string()));
        state
            .work_orders
            .get(work_order)
            .cloned()
            .unwrap_or_else(|| {
                Err(ApiError::Rejected {
                    endpoint: Endpoint::WorkOrder,
                    id: work_order.to_string(),
                })
            })
    }

    async fn serial(&self, serial: &str) -> Result<SerialInfo, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ApiCall::Serial(serial.to_string()));
        state.serials.get(serial).cloned().unwrap_or_else(|| {
            Err(ApiError::Rejected {
                endpoint: Endpoint::Serial,
                id: serial.to_string(),
            })
        })
    }

    async fn current_work_order(&self, work_order: &str) -> Result<String, ApiError> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(ApiCall::CurrentWorkOrder(work_order.to_string()));
        if state.monitor.len() > 1 {
            if let Some(answer) = state.monitor.pop_front() {
                return answer;
            }
        }
        state
            .monitor
            .front()
            .cloned()
            .unwrap_or_else(|| Ok(work_order.to_string()))
    }
}
