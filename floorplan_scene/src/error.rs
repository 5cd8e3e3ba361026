// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned across the dispatch boundary.

use floorplan_model::RecordError;
use serde_json::{Value, json};
use thiserror::Error;

/// Why a command was rejected. A rejected command changes nothing.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CommandError {
    /// No method with this name.
    #[error("Unknown method: {0}")]
    UnknownMethod(String),
    /// Parameters were missing or had the wrong shape.
    #[error("Invalid params for {method}: {reason}")]
    InvalidParams {
        /// Method name.
        method: String,
        /// Parser message.
        reason: String,
    },
    /// `furniture.place` named an item not in the catalog.
    #[error("Unknown catalog item: {0}")]
    UnknownCatalogItem(String),
    /// No furniture instance with this mesh id.
    #[error("Furniture not found: {0}")]
    FurnitureNotFound(String),
    /// No wall with this id.
    #[error("Wall not found: {0}")]
    WallNotFound(String),
    /// No floor tile with this id.
    #[error("Floor tile not found: {0}")]
    TileNotFound(String),
    /// No stair with this id.
    #[error("Stair not found: {0}")]
    StairNotFound(String),
    /// The record could not be built or changed.
    #[error(transparent)]
    Record(#[from] RecordError),
}

impl CommandError {
    /// The `{ "error": message }` payload handed back to callers.
    pub fn to_payload(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_display_text() {
        let err = CommandError::FurnitureNotFound("m9".into());
        assert_eq!(err.to_payload(), json!({ "error": "Furniture not found: m9" }));
        let err = CommandError::from(RecordError::InvalidHeightFloors(0));
        assert_eq!(err.to_string(), "wall must span at least one floor, got 0");
    }
}
