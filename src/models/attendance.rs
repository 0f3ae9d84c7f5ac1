//! Attendance model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendance {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub registration_id: i64,
    pub marked_by: i64,
    pub method: String,
    pub notes: Option<String>,
    pub marked_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Attendance {
    pub fn method(&self) -> Option<AttendanceMethod> {
        AttendanceMethod::parse(&self.method)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAttendanceRequest {
    pub user_id: i64,
    pub event_id: i64,
    pub marked_by: i64,
    pub method: AttendanceMethod,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceMethod {
    QrScan,
    Manual,
    BulkUpload,
}

impl AttendanceMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceMethod::QrScan => "qr_scan",
            AttendanceMethod::Manual => "manual",
            AttendanceMethod::BulkUpload => "bulk_upload",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "qr_scan" => Some(AttendanceMethod::QrScan),
            "manual" => Some(AttendanceMethod::Manual),
            "bulk_upload" => Some(AttendanceMethod::BulkUpload),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttendanceMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
