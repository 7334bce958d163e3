//! Environment-driven generation settings.
//!
//! All four knobs exist to bound LLM spend and respect provider rate
//! limits. Defaults are deliberately conservative (low iteration count, low
//! token budget, low request rate) because the pipeline fans out five
//! agent/task pairs that could otherwise multiply cost.
//!
//! # Environment Variables
//!
//! - `MODEL` - model identifier (default `gpt-4o-mini`)
//! - `MAX_TOKENS` - max output tokens per completion (default 300)
//! - `MAX_ITER` - max reasoning iterations per agent (default 2)
//! - `MAX_RPM` - max requests per minute across the whole crew (default 2)
//!
//! The environment is read exactly once, at `Settings::from_env` time; the
//! resulting struct is passed by reference into the agent and crew
//! builders. No module carries hidden global state.

use crate::error::{CrewlError, Result};
use std::env;

/// Model used when `MODEL` is unset.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Replacement for the deprecated Gemini 1.5 Flash aliases.
pub const GEMINI_FLASH_SUCCESSOR: &str = "gemini/gemini-2.0-flash-001";

/// Sampling temperature for every agent's model handle.
pub const MODEL_TEMPERATURE: f32 = 0.7;

const DEFAULT_MAX_TOKENS: u32 = 300;
const DEFAULT_MAX_ITER: u32 = 2;
const DEFAULT_MAX_RPM: u32 = 2;

/// Gemini 1.5 Flash spellings that providers no longer serve.
const DEPRECATED_GEMINI_ALIASES: &[&str] = &[
    "gemini-1.5-flash",
    "gemini/gemini-1.5-flash",
    "models/gemini-1.5-flash",
];

/// Normalize a raw model identifier.
///
/// Trims surrounding whitespace and rewrites the deprecated Gemini 1.5
/// Flash aliases to their supported successor. Any other value passes
/// through unchanged; there is no validation against a provider's live
/// model list, so a typo surfaces later as a runtime failure.
pub fn normalize_model(raw: &str) -> String {
    let model = raw.trim();
    if DEPRECATED_GEMINI_ALIASES.contains(&model) {
        GEMINI_FLASH_SUCCESSOR.to_string()
    } else {
        model.to_string()
    }
}

/// Resolve the model identifier from `MODEL`.
pub fn resolve_model() -> String {
    let raw = env::var("MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    normalize_model(&raw)
}

/// Resolve `MAX_TOKENS` (max output tokens per completion).
pub fn resolve_max_tokens() -> Result<u32> {
    resolve_numeric("MAX_TOKENS", DEFAULT_MAX_TOKENS)
}

/// Resolve `MAX_ITER` (max reasoning iterations per agent).
pub fn resolve_max_iter() -> Result<u32> {
    resolve_numeric("MAX_ITER", DEFAULT_MAX_ITER)
}

/// Resolve `MAX_RPM` (max runtime invocations per minute, crew-wide).
pub fn resolve_max_rpm() -> Result<u32> {
    resolve_numeric("MAX_RPM", DEFAULT_MAX_RPM)
}

/// Read a numeric environment variable, falling back to a default when the
/// variable is unset. A present-but-unparsable value is an error.
fn resolve_numeric(name: &str, default: u32) -> Result<u32> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            CrewlError::UserError(format!(
                "environment variable {} must be an integer, got '{}'",
                name, raw
            ))
        }),
        Err(_) => Ok(default),
    }
}

/// Generation settings resolved once from the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Normalized model identifier.
    pub model: String,

    /// Max output tokens per completion.
    pub max_tokens: u32,

    /// Max reasoning iterations per agent.
    pub max_iter: u32,

    /// Max runtime invocations per minute across the whole crew.
    /// Zero disables throttling.
    pub max_rpm: u32,
}

impl Settings {
    /// Resolve all settings from the environment.
    ///
    /// Fails if any numeric variable is present but unparsable; the caller
    /// (the command layer) propagates that straight to process exit.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            model: resolve_model(),
            max_tokens: resolve_max_tokens()?,
            max_iter: resolve_max_iter()?,
            max_rpm: resolve_max_rpm()?,
        })
    }

    /// Build a fresh model handle for one agent.
    pub fn model_handle(&self) -> ModelHandle {
        ModelHandle {
            model: self.model.clone(),
            temperature: MODEL_TEMPERATURE,
            max_tokens: self.max_tokens,
        }
    }
}

/// The resolved model identifier plus generation parameters used for one
/// agent's LLM calls. Fixed at construction; never mutated during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelHandle {
    /// Normalized model identifier (deprecated aliases already rewritten).
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Max output tokens per completion.
    pub max_tokens: u32,
}
