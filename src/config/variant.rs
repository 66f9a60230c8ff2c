// Stream output variant model - decoding, defaulting, and legacy migration

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Framerate applied when a variant does not declare one.
pub const DEFAULT_FRAMERATE: u32 = 24;

/// CPU usage level applied when a variant does not declare one.
pub const DEFAULT_CPU_USAGE_LEVEL: u32 = 3;

/// Encoder preset assumed for variants still using the legacy preset field.
pub const DEFAULT_ENCODER_PRESET: &str = "veryfast";

/// Legacy preset names and the CPU usage level each maps to.
///
/// Presets outside this table resolve to level 0, which consumers must treat
/// as "unspecified" rather than a valid level.
pub const PRESET_CPU_USAGE_LEVELS: [(&str, u32); 5] = [
    ("ultrafast", 1),
    ("superfast", 2),
    ("veryfast", 3),
    ("faster", 4),
    ("fast", 5),
];

/// Errors produced while decoding an untyped variant definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("variant definition must be a key-value mapping, got {actual}")]
    NotAMapping { actual: &'static str },

    #[error("field `{field}` expects {expected}, got {actual}")]
    FieldType {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
}

/// One output rendition of a transcoded stream.
///
/// A variant is built by decoding an untyped definition with
/// [`StreamOutputVariant::from_value`] (or through serde) and is fully
/// resolved afterward: every field holds a concrete value, and the
/// `effective_*` accessors apply the passthrough overrides on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOutputVariant {
    /// Copy the source video directly, disabling all video encode settings.
    ///
    /// A zero `video_bitrate` forces this on during decode; the two fields
    /// are coupled even though they look independent.
    pub video_passthrough: bool,
    /// Copy the source audio directly, disabling all audio encode settings.
    /// A zero `audio_bitrate` forces this on as well.
    pub audio_passthrough: bool,

    /// Target video bitrate in kbps. Only meaningful when video is encoded.
    pub video_bitrate: u32,
    /// Target audio bitrate in kbps. Only meaningful when audio is encoded.
    pub audio_bitrate: u32,

    /// Output width in pixels, 0 meaning unset. Set only one of width and
    /// height to keep the source aspect ratio, or neither to skip scaling.
    pub scaled_width: u32,
    /// Output height in pixels, 0 meaning unset.
    pub scaled_height: u32,

    /// Target output framerate. Consumers should read
    /// [`StreamOutputVariant::effective_framerate`], which forces this to 0
    /// for passthrough video.
    pub framerate: u32,
    /// Legacy named encoder preset, superseded by `cpu_usage_level`. Kept
    /// until migrated configs are gone; do not surface it in new APIs.
    pub encoder_preset: String,
    /// Speed/quality tradeoff for the video encoder, 1 (lowest CPU) to 5.
    pub cpu_usage_level: u32,
}

impl Default for StreamOutputVariant {
    fn default() -> Self {
        // Matches decoding an empty definition: both streams passthrough.
        Self {
            video_passthrough: true,
            audio_passthrough: true,
            video_bitrate: 0,
            audio_bitrate: 0,
            scaled_width: 0,
            scaled_height: 0,
            framerate: DEFAULT_FRAMERATE,
            encoder_preset: String::new(),
            cpu_usage_level: DEFAULT_CPU_USAGE_LEVEL,
        }
    }
}

impl StreamOutputVariant {
    /// The framerate the pipeline should target, or 0 when video is
    /// passthrough and no framerate applies.
    pub fn effective_framerate(&self) -> u32 {
        if self.video_passthrough {
            return 0;
        }

        if self.framerate > 0 {
            self.framerate
        } else {
            DEFAULT_FRAMERATE
        }
    }

    /// The legacy encoder preset with the default applied, or empty when
    /// video is passthrough. New code should use
    /// [`StreamOutputVariant::effective_cpu_usage_level`] instead.
    pub fn effective_encoder_preset(&self) -> &str {
        if self.video_passthrough {
            return "";
        }

        if !self.encoder_preset.is_empty() {
            &self.encoder_preset
        } else {
            DEFAULT_ENCODER_PRESET
        }
    }

    /// The CPU usage level implied by the effective preset, or 0 when the
    /// preset is outside [`PRESET_CPU_USAGE_LEVELS`] (including passthrough
    /// video, where nothing is encoded at all).
    pub fn effective_cpu_usage_level(&self) -> u32 {
        let preset = self.effective_encoder_preset();
        PRESET_CPU_USAGE_LEVELS
            .iter()
            .find(|(name, _)| *name == preset)
            .map(|(_, level)| *level)
            .unwrap_or(0)
    }

    /// Whether audio should be copied: either the flag is set, or a zero
    /// bitrate implies it.
    pub fn is_audio_passthrough(&self) -> bool {
        self.audio_passthrough || self.audio_bitrate == 0
    }

    /// Decode an untyped variant definition, applying the defaulting rules.
    ///
    /// Fields are extracted with their wire types checked first, then
    /// resolved in a fixed priority order; a zero or missing bitrate switches
    /// the corresponding stream to passthrough regardless of the declared
    /// flags. Either a fully-resolved variant comes back or a [`DecodeError`]
    /// naming the offending field; there is no partial result.
    pub fn from_value(raw: &Value) -> Result<Self, DecodeError> {
        RawVariant::extract(raw).map(RawVariant::resolve)
    }
}

/// Typed view of a variant definition before defaulting: each field is
/// present or absent, with the wire type already checked.
#[derive(Debug, Default)]
struct RawVariant {
    video_passthrough: Option<bool>,
    audio_passthrough: Option<bool>,
    video_bitrate: Option<u32>,
    audio_bitrate: Option<u32>,
    scaled_width: Option<u32>,
    scaled_height: Option<u32>,
    framerate: Option<u32>,
    encoder_preset: Option<String>,
    cpu_usage_level: Option<u32>,
}

impl RawVariant {
    fn extract(raw: &Value) -> Result<Self, DecodeError> {
        let fields = raw.as_object().ok_or(DecodeError::NotAMapping {
            actual: value_kind(raw),
        })?;

        Ok(Self {
            video_passthrough: bool_field(fields, "videoPassthrough")?,
            audio_passthrough: bool_field(fields, "audioPassthrough")?,
            video_bitrate: uint_field(fields, "videoBitrate")?,
            audio_bitrate: uint_field(fields, "audioBitrate")?,
            scaled_width: uint_field(fields, "scaledWidth")?,
            scaled_height: uint_field(fields, "scaledHeight")?,
            framerate: uint_field(fields, "framerate")?,
            encoder_preset: string_field(fields, "encoderPreset")?,
            cpu_usage_level: uint_field(fields, "cpuUsageLevel")?,
        })
    }

    fn resolve(self) -> StreamOutputVariant {
        let mut video_passthrough = self.video_passthrough.unwrap_or(false);
        let mut audio_passthrough = self.audio_passthrough.unwrap_or(true);

        // A zero bitrate has no transcoding meaning, so it flips the stream
        // to passthrough even when the flag said otherwise.
        let video_bitrate = self.video_bitrate.unwrap_or(0);
        if video_bitrate == 0 {
            video_passthrough = true;
        }

        let audio_bitrate = self.audio_bitrate.unwrap_or(0);
        if audio_bitrate == 0 {
            audio_passthrough = true;
        }

        StreamOutputVariant {
            video_passthrough,
            audio_passthrough,
            video_bitrate,
            audio_bitrate,
            scaled_width: self.scaled_width.unwrap_or(0),
            scaled_height: self.scaled_height.unwrap_or(0),
            framerate: non_zero_or(self.framerate, DEFAULT_FRAMERATE),
            encoder_preset: self.encoder_preset.unwrap_or_default(),
            cpu_usage_level: non_zero_or(self.cpu_usage_level, DEFAULT_CPU_USAGE_LEVEL),
        }
    }
}

fn non_zero_or(value: Option<u32>, default: u32) -> u32 {
    match value {
        Some(v) if v > 0 => v,
        _ => default,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}

fn bool_field(
    fields: &serde_json::Map<String, Value>,
    name: &'static str,
) -> Result<Option<bool>, DecodeError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(other) => Err(DecodeError::FieldType {
            field: name,
            expected: "boolean",
            actual: value_kind(other),
        }),
    }
}

// An empty string counts as unset, a relic of configs that cleared numeric
// fields by blanking them.
fn uint_field(
    fields: &serde_json::Map<String, Value>,
    name: &'static str,
) -> Result<Option<u32>, DecodeError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.is_empty() => Ok(None),
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|wide| u32::try_from(wide).ok())
            .map(Some)
            .ok_or(DecodeError::FieldType {
                field: name,
                expected: "non-negative integer",
                actual: "number",
            }),
        Some(other) => Err(DecodeError::FieldType {
            field: name,
            expected: "non-negative integer",
            actual: value_kind(other),
        }),
    }
}

fn string_field(
    fields: &serde_json::Map<String, Value>,
    name: &'static str,
) -> Result<Option<String>, DecodeError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(other) => Err(DecodeError::FieldType {
            field: name,
            expected: "string",
            actual: value_kind(other),
        }),
    }
}

impl<'de> Deserialize<'de> for StreamOutputVariant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Self::from_value(&raw).map_err(serde::de::Error::custom)
    }
}

/// Wire shape for encoding. Framerate is replaced with the effective value
/// so consumers always see the framerate that will actually be produced;
/// this is the one intentional decode/encode asymmetry.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EncodedVariant<'a> {
    video_passthrough: bool,
    audio_passthrough: bool,
    video_bitrate: u32,
    audio_bitrate: u32,
    #[serde(skip_serializing_if = "is_zero")]
    scaled_width: u32,
    #[serde(skip_serializing_if = "is_zero")]
    scaled_height: u32,
    framerate: u32,
    encoder_preset: &'a str,
    cpu_usage_level: u32,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl Serialize for StreamOutputVariant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        EncodedVariant {
            video_passthrough: self.video_passthrough,
            audio_passthrough: self.audio_passthrough,
            video_bitrate: self.video_bitrate,
            audio_bitrate: self.audio_bitrate,
            scaled_width: self.scaled_width,
            scaled_height: self.scaled_height,
            framerate: self.effective_framerate(),
            encoder_preset: &self.encoder_preset,
            cpu_usage_level: self.cpu_usage_level,
        }
        .serialize(serializer)
    }
}
