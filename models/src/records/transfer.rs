use crate::Many2One;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferState {
    Draft,
    Waiting,
    Confirmed,
    Assigned,
    Done,
    Cancel,
}

impl TransferState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferState::Draft => "draft",
            TransferState::Waiting => "waiting",
            TransferState::Confirmed => "confirmed",
            TransferState::Assigned => "assigned",
            TransferState::Done => "done",
            TransferState::Cancel => "cancel",
        }
    }

    /// Not yet done or cancelled.
    pub fn is_pending(&self) -> bool {
        !matches!(self, TransferState::Done | TransferState::Cancel)
    }
}

impl FromStr for TransferState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(TransferState::Draft),
            "waiting" => Ok(TransferState::Waiting),
            "confirmed" => Ok(TransferState::Confirmed),
            "assigned" => Ok(TransferState::Assigned),
            "done" => Ok(TransferState::Done),
            "cancel" => Ok(TransferState::Cancel),
            other => Err(format!("unknown transfer state '{other}'")),
        }
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An internal stock picking between two locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: i64,
    pub name: String,
    pub origin: Option<String>,
    pub state: TransferState,
    pub scheduled_date: Option<String>,
    pub source: Option<Many2One>,
    pub destination: Option<Many2One>,
}
