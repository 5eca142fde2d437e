//! Single-line share codes for level configurations.
//!
//! A code carries the full level in the form
//! `courier:v1:<width>x<height>:<base64 payload>` so players can pass a
//! layout around as one clipboard-friendly token.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use grid_courier_core::{GridCoord, LevelConfig};

const LEVEL_DOMAIN: &str = "courier";
const LEVEL_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded level payload.
const LEVEL_CODE_HEADER: &str = "courier:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableLevel {
    cell_length: f32,
    obstacles: Vec<GridCoord>,
    spawn: GridCoord,
}

/// Encodes a level into a single-line string suitable for sharing.
pub(crate) fn encode(config: &LevelConfig) -> String {
    let payload = SerializableLevel {
        cell_length: config.cell_length,
        obstacles: config.obstacles.clone(),
        spawn: config.spawn,
    };
    let json = serde_json::to_vec(&payload).expect("level snapshot serialization never fails");
    let encoded = STANDARD_NO_PAD.encode(json);
    format!(
        "{LEVEL_CODE_HEADER}:{}x{}:{encoded}",
        config.width, config.height
    )
}

/// Decodes a level from the provided share code.
pub(crate) fn decode(value: &str) -> Result<LevelConfig, LevelCodeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LevelCodeError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LevelCodeError::MissingPrefix)?;
    let version = parts.next().ok_or(LevelCodeError::MissingVersion)?;
    let dimensions = parts.next().ok_or(LevelCodeError::MissingDimensions)?;
    let payload = parts.next().ok_or(LevelCodeError::MissingPayload)?;

    if domain != LEVEL_DOMAIN {
        return Err(LevelCodeError::InvalidPrefix(domain.to_owned()));
    }
    if version != LEVEL_VERSION {
        return Err(LevelCodeError::UnsupportedVersion(version.to_owned()));
    }

    let (width, height) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LevelCodeError::InvalidEncoding)?;
    let decoded: SerializableLevel =
        serde_json::from_slice(&bytes).map_err(LevelCodeError::InvalidPayload)?;

    Ok(LevelConfig {
        width,
        height,
        obstacles: decoded.obstacles,
        spawn: decoded.spawn,
        cell_length: decoded.cell_length,
    })
}

/// Errors that can occur while decoding level share codes.
#[derive(Debug, Error)]
pub(crate) enum LevelCodeError {
    /// The provided string was empty or contained only whitespace.
    #[error("level code was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the code.
    #[error("level code is missing the prefix")]
    MissingPrefix,
    /// The code did not contain a version segment.
    #[error("level code is missing the version")]
    MissingVersion,
    /// The code did not include grid dimensions.
    #[error("level code is missing the grid dimensions")]
    MissingDimensions,
    /// The code did not include the payload segment.
    #[error("level code is missing the payload")]
    MissingPayload,
    /// The code used an unexpected prefix segment.
    #[error("level prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The code used an unsupported version identifier.
    #[error("level version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the code.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode level payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse level payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LevelCodeError> {
    let (width, height) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| LevelCodeError::InvalidDimensions(dimensions.to_owned()))?;

    let width = width
        .trim()
        .parse::<u32>()
        .map_err(|_| LevelCodeError::InvalidDimensions(dimensions.to_owned()))?;
    let height = height
        .trim()
        .parse::<u32>()
        .map_err(|_| LevelCodeError::InvalidDimensions(dimensions.to_owned()))?;

    if width == 0 || height == 0 {
        return Err(LevelCodeError::InvalidDimensions(dimensions.to_owned()));
    }

    Ok((width, height))
}
