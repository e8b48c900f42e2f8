//! Closed enumerations classifying tasks along the two board axes.
//!
//! `Priority` and `Status` are independent: changing one never implies a
//! change to the other. The serialized keys (`low`, `in_progress`, ...)
//! double as board drop-zone identifiers.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task importance. One of the two board axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Fixed column order for the priority board.
    pub const BOARD_ORDER: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn key(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

/// Workflow progress. The second, independent board axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Todo,
    InProgress,
    Done,
}

impl Status {
    /// Fixed column order for the status board.
    pub const BOARD_ORDER: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    pub fn key(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in_progress",
            Status::Done => "done",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Todo => "To Do",
            Status::InProgress => "Work In Progress",
            Status::Done => "Completed",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "todo" => Some(Status::Todo),
            "in_progress" => Some(Status::InProgress),
            "done" => Some(Status::Done),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for p in Priority::BOARD_ORDER {
            assert_eq!(Priority::from_key(p.key()), Some(p));
        }
        for s in Status::BOARD_ORDER {
            assert_eq!(Status::from_key(s.key()), Some(s));
        }
    }

    #[test]
    fn serde_keys_match_board_keys() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"high\"");
    }

    #[test]
    fn unknown_key_rejected() {
        assert_eq!(Priority::from_key("urgent"), None);
        assert_eq!(Status::from_key("in-progress"), None);
    }
}
