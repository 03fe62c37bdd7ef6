use crate::Many2One;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PosSessionState {
    OpeningControl,
    Opened,
    ClosingControl,
    Closed,
}

impl PosSessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosSessionState::OpeningControl => "opening_control",
            PosSessionState::Opened => "opened",
            PosSessionState::ClosingControl => "closing_control",
            PosSessionState::Closed => "closed",
        }
    }
}

impl FromStr for PosSessionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "opening_control" => Ok(PosSessionState::OpeningControl),
            "opened" => Ok(PosSessionState::Opened),
            "closing_control" => Ok(PosSessionState::ClosingControl),
            "closed" => Ok(PosSessionState::Closed),
            other => Err(format!("unknown POS session state '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosSession {
    pub id: i64,
    pub name: String,
    pub user: Option<Many2One>,
    pub start_at: Option<String>,
    pub state: PosSessionState,
}
