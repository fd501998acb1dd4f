// Copyright (c) 2024 Mike Tsao

//! Common data types.

use derivative::Derivative;
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{Display, FromRepr};

/// The error type for this crate.
#[derive(Debug, thiserror::Error)]
pub enum MixerError {
    /// A persisted color theme discriminant wasn't recognized.
    #[error("unknown color theme {0}")]
    UnknownColorTheme(u8),
    /// A persisted fade CV mode discriminant wasn't recognized.
    #[error("unknown fade CV mode {0}")]
    UnknownFadeCvMode(u8),
}

/// [SampleRate] is the number of audio samples per second, in Hertz.
#[derive(Clone, Copy, Debug, Derivative, Eq, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
pub struct SampleRate(#[derivative(Default(value = "44100"))] pub usize);
impl SampleRate {
    /// The default sample rate, used when the host hasn't said otherwise.
    pub const DEFAULT_SAMPLE_RATE: usize = 44100;
    /// The default [SampleRate].
    pub const DEFAULT: SampleRate = SampleRate::new(Self::DEFAULT_SAMPLE_RATE);

    /// Creates a [SampleRate], substituting the default for zero so a
    /// division by the rate is always safe.
    pub const fn new(value: usize) -> Self {
        if value != 0 {
            Self(value)
        } else {
            Self(Self::DEFAULT_SAMPLE_RATE)
        }
    }

    /// The duration of one sample, in seconds.
    pub fn sample_time(&self) -> f32 {
        1.0 / self.0.max(1) as f32
    }
}
impl core::fmt::Display for SampleRate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl From<f64> for SampleRate {
    fn from(value: f64) -> Self {
        Self::new(value as usize)
    }
}
impl From<SampleRate> for f64 {
    fn from(value: SampleRate) -> Self {
        value.0 as f64
    }
}
impl From<SampleRate> for f32 {
    fn from(value: SampleRate) -> Self {
        value.0 as f32
    }
}

/// The panel color theme of a module instance. Persisted as a plain number;
/// an unrecognized number in a record loads as the default rather than
/// failing the load. [TryFrom] is the strict conversion for host surfaces
/// that validate live input.
#[derive(Clone, Copy, Debug, Default, Display, Eq, FromRepr, PartialEq, Serialize)]
#[serde(into = "u8")]
#[repr(u8)]
pub enum ColorTheme {
    /// The light factory panel.
    #[default]
    Cream = 0,
    /// The dark panel.
    Night = 1,
}
impl From<ColorTheme> for u8 {
    fn from(value: ColorTheme) -> Self {
        value as u8
    }
}
impl TryFrom<u8> for ColorTheme {
    type Error = MixerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_repr(value).ok_or(MixerError::UnknownColorTheme(value))
    }
}
impl<'de> Deserialize<'de> for ColorTheme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_repr(u8::deserialize(deserializer)?).unwrap_or_default())
    }
}

/// Which fade direction(s) the master module's fade CV controls. Persisted
/// as a plain number; an unrecognized number in a record loads as the
/// default rather than failing the load. [TryFrom] is the strict conversion
/// for host surfaces that validate live input.
#[derive(Clone, Copy, Debug, Default, Display, Eq, FromRepr, PartialEq, Serialize)]
#[serde(into = "u8")]
#[repr(u8)]
pub enum FadeCvMode {
    /// The CV sets both the fade-in and fade-out durations.
    #[default]
    Both = 0,
    /// The CV sets only the fade-in duration.
    FadeInOnly = 1,
    /// The CV sets only the fade-out duration.
    FadeOutOnly = 2,
}
impl From<FadeCvMode> for u8 {
    fn from(value: FadeCvMode) -> Self {
        value as u8
    }
}
impl TryFrom<u8> for FadeCvMode {
    type Error = MixerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_repr(value).ok_or(MixerError::UnknownFadeCvMode(value))
    }
}
impl<'de> Deserialize<'de> for FadeCvMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_repr(u8::deserialize(deserializer)?).unwrap_or_default())
    }
}
