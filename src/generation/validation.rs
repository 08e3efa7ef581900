use serde_json::Value;

use super::{AspectRatio, GenerationParams, Quality, DEFAULT_DURATION_SECS};
use crate::error::ValidationError;

pub const MIN_PROMPT_CHARS: usize = 10;
pub const MAX_PROMPT_CHARS: usize = 1000;
pub const MIN_DURATION_SECS: i64 = 1;
pub const MAX_DURATION_SECS: i64 = 30;

/// Matched case-insensitively as substrings.
pub const DISALLOWED_PATTERNS: [&str; 4] = ["violence", "explicit", "nsfw", "adult content"];

/// A generation request as supplied by the caller, before validation.
///
/// Fields hold the raw JSON values so that type errors are reported by
/// [`GenerationRequest::validate`] in field order, like range errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub prompt: Option<Value>,
    pub duration: Option<Value>,
    pub aspect_ratio: Option<Value>,
    pub quality: Option<Value>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(Value::String(prompt.into())),
            ..Default::default()
        }
    }

    pub fn with_duration(mut self, seconds: i64) -> Self {
        self.duration = Some(Value::from(seconds));
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: &str) -> Self {
        self.aspect_ratio = Some(Value::from(ratio));
        self
    }

    pub fn with_quality(mut self, quality: &str) -> Self {
        self.quality = Some(Value::from(quality));
        self
    }

    /// Picks the request fields out of a loosely typed JSON body. Nothing is
    /// checked here; a non-object body simply has no fields.
    pub fn from_json(body: &Value) -> Self {
        let field = |name: &str| body.get(name).cloned();
        Self {
            prompt: field("prompt"),
            duration: field("duration"),
            aspect_ratio: field("aspectRatio"),
            quality: field("quality"),
        }
    }

    /// Checks every field and resolves defaults. Checks run in a fixed
    /// order: prompt, duration, aspect ratio, quality.
    ///
    /// Absent, `null` and empty-string optional fields fall back to their
    /// defaults. Values of the wrong JSON type get the message for that field.
    pub fn validate(&self) -> Result<GenerationParams, ValidationError> {
        let prompt = match &self.prompt {
            Some(Value::String(p)) if !p.is_empty() => p,
            _ => return Err(ValidationError::PromptRequired),
        };
        validate_prompt(prompt)?;

        let duration = match self.duration.as_ref().map(whole_seconds) {
            None | Some(Ok(None)) => DEFAULT_DURATION_SECS,
            Some(Ok(Some(d))) if (MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&d) => d as u32,
            Some(_) => return Err(ValidationError::DurationOutOfRange),
        };

        let aspect_ratio = match optional_str(&self.aspect_ratio, ValidationError::InvalidAspectRatio)? {
            Some(raw) => raw
                .parse::<AspectRatio>()
                .map_err(|_| ValidationError::InvalidAspectRatio)?,
            None => AspectRatio::default(),
        };

        let quality = match optional_str(&self.quality, ValidationError::InvalidQuality)? {
            Some(raw) => raw
                .parse::<Quality>()
                .map_err(|_| ValidationError::InvalidQuality)?,
            None => Quality::default(),
        };

        Ok(GenerationParams {
            prompt: prompt.clone(),
            duration,
            aspect_ratio,
            quality,
        })
    }
}

/// `null` is no duration. Integral floats such as `5.0` count as whole seconds.
fn whole_seconds(value: &Value) -> Result<Option<i64>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(secs), _) => Ok(Some(secs)),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => Ok(Some(f as i64)),
            _ => Err(ValidationError::DurationOutOfRange),
        },
        _ => Err(ValidationError::DurationOutOfRange),
    }
}

fn optional_str(
    value: &Option<Value>,
    invalid: ValidationError,
) -> Result<Option<&str>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(invalid),
    }
}

/// Length is counted in characters, not bytes.
pub fn validate_prompt(prompt: &str) -> Result<(), ValidationError> {
    if prompt.trim().is_empty() {
        return Err(ValidationError::PromptEmpty);
    }

    let chars = prompt.chars().count();
    if chars < MIN_PROMPT_CHARS {
        return Err(ValidationError::PromptTooShort);
    }
    if chars > MAX_PROMPT_CHARS {
        return Err(ValidationError::PromptTooLong);
    }

    let lowered = prompt.to_lowercase();
    if DISALLOWED_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
    {
        return Err(ValidationError::PromptDisallowed);
    }

    Ok(())
}
