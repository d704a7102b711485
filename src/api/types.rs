// Payloads returned by the manufacturing API

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The three lookups the station performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    WorkOrder,
    Serial,
    WorkOrderMonitor,
}

impl Endpoint {
    /// First path segment of the route
    pub fn route(self) -> &'static str {
        match self {
            Endpoint::WorkOrder => "wo",
            Endpoint::Serial => "serial",
            Endpoint::WorkOrderMonitor => "wo_monitor",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::WorkOrder => f.write_str("work order"),
            Endpoint::Serial => f.write_str("serial number"),
            Endpoint::WorkOrderMonitor => f.write_str("work order monitor"),
        }
    }
}

/// Press and raw material for a work order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderInfo {
    pub press: String,
    pub raw_material: String,
}

/// Raw material item number behind a serial number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialInfo {
    pub item_number: String,
}

/// `GET /wo/{id}`
#[derive(Debug, Deserialize)]
pub(crate) struct WorkOrderPayload {
    #[serde(default)]
    pub error: Option<Value>,
    pub press: Option<String>,
    pub rmat: Option<String>,
}

/// `GET /serial/{sn}`
#[derive(Debug, Deserialize)]
pub(crate) struct SerialPayload {
    #[serde(default)]
    pub error: Option<Value>,
    pub itemno: Option<String>,
}

/// `GET /wo_monitor/{id}`
#[derive(Debug, Deserialize)]
pub(crate) struct MonitorPayload {
    #[serde(default)]
    pub error: Option<Value>,
    pub wo_id: Option<String>,
}

/// The service flags failures with an `error` field of any truthy value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

pub(crate) fn flagged(error: &Option<Value>) -> bool {
    error.as_ref().is_some_and(is_truthy)
}
