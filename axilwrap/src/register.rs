//! Register-slice modes of the AXI-Lite channels.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[allow(missing_docs)]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterTypeError {
    #[error("unknown register type `{0}` (expected bypass, simple_buffer or skid_buffer)")]
    Unknown(String),
}

/// Buffering strategy inserted into one channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterType {
    /// No register, the channel passes through.
    Bypass,

    /// Registered output; inserts a bubble cycle on back-pressure.
    #[default]
    SimpleBuffer,

    /// Registered output with a skid slot; full throughput.
    SkidBuffer,
}

impl RegisterType {
    /// Value of the `*_REG_TYPE` parameter.
    pub const fn value(self) -> usize {
        match self {
            Self::Bypass => 0,
            Self::SimpleBuffer => 1,
            Self::SkidBuffer => 2,
        }
    }

    /// Upper-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bypass => "BYPASS",
            Self::SimpleBuffer => "SIMPLE_BUFFER",
            Self::SkidBuffer => "SKID_BUFFER",
        }
    }

    /// Returns the mode of the given parameter value.
    pub const fn from_value(value: u64) -> Option<Self> {
        match value {
            0 => Some(Self::Bypass),
            1 => Some(Self::SimpleBuffer),
            2 => Some(Self::SkidBuffer),
            _ => None,
        }
    }
}

impl fmt::Display for RegisterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for RegisterType {
    type Err = RegisterTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bypass" | "0" => Ok(Self::Bypass),
            "simple_buffer" | "simple" | "1" => Ok(Self::SimpleBuffer),
            "skid_buffer" | "skid" | "2" => Ok(Self::SkidBuffer),
            _ => Err(RegisterTypeError::Unknown(s.to_string())),
        }
    }
}

struct RegisterTypeVisitor;

impl<'de> Visitor<'de> for RegisterTypeVisitor {
    type Value = RegisterType;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a register type name or its parameter value (0, 1, 2)")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> { v.parse().map_err(E::custom) }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        RegisterType::from_value(v).ok_or_else(|| E::custom(RegisterTypeError::Unknown(v.to_string())))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .ok()
            .and_then(RegisterType::from_value)
            .ok_or_else(|| E::custom(RegisterTypeError::Unknown(v.to_string())))
    }
}

impl<'de> Deserialize<'de> for RegisterType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RegisterTypeVisitor)
    }
}

/// Register modes of the five channels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegisterConfig {
    /// Write address channel.
    #[serde(rename = "aw_reg")]
    pub aw: RegisterType,

    /// Write data channel.
    #[serde(rename = "w_reg")]
    pub w: RegisterType,

    /// Write response channel.
    #[serde(rename = "b_reg")]
    pub b: RegisterType,

    /// Read address channel.
    #[serde(rename = "ar_reg")]
    pub ar: RegisterType,

    /// Read data channel.
    #[serde(rename = "r_reg")]
    pub r: RegisterType,
}

impl RegisterConfig {
    /// Same mode on every channel.
    pub const fn uniform(typ: RegisterType) -> Self { Self { aw: typ, w: typ, b: typ, ar: typ, r: typ } }

    /// Sets the write address channel mode.
    #[must_use]
    pub const fn with_aw(self, aw: RegisterType) -> Self { Self { aw, ..self } }

    /// Sets the write data channel mode.
    #[must_use]
    pub const fn with_w(self, w: RegisterType) -> Self { Self { w, ..self } }

    /// Sets the write response channel mode.
    #[must_use]
    pub const fn with_b(self, b: RegisterType) -> Self { Self { b, ..self } }

    /// Sets the read address channel mode.
    #[must_use]
    pub const fn with_ar(self, ar: RegisterType) -> Self { Self { ar, ..self } }

    /// Sets the read data channel mode.
    #[must_use]
    pub const fn with_r(self, r: RegisterType) -> Self { Self { r, ..self } }

    /// `(channel, mode)` pairs in `aw, w, b, ar, r` order.
    pub fn channels(&self) -> [(&'static str, RegisterType); 5] {
        [("aw", self.aw), ("w", self.w), ("b", self.b), ("ar", self.ar), ("r", self.r)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_values() {
        assert_eq!(RegisterType::Bypass.value(), 0);
        assert_eq!(RegisterType::SimpleBuffer.value(), 1);
        assert_eq!(RegisterType::SkidBuffer.value(), 2);
        assert_eq!(RegisterType::from_value(3), None);
    }

    #[test]
    fn parse_names_and_values() {
        assert_eq!("Skid_Buffer".parse::<RegisterType>(), Ok(RegisterType::SkidBuffer));
        assert_eq!("simple".parse::<RegisterType>(), Ok(RegisterType::SimpleBuffer));
        assert_eq!("0".parse::<RegisterType>(), Ok(RegisterType::Bypass));
        assert_eq!("fifo".parse::<RegisterType>(), Err(RegisterTypeError::Unknown("fifo".into())));
    }

    #[test]
    fn default_is_simple_buffer_everywhere() {
        let config = RegisterConfig::default();
        assert!(config.channels().iter().all(|(_, typ)| *typ == RegisterType::SimpleBuffer));
    }

    #[test]
    fn builder_sets_one_channel() {
        let config = RegisterConfig::uniform(RegisterType::Bypass).with_r(RegisterType::SkidBuffer);
        assert_eq!(config.channels().map(|(_, typ)| typ.value()), [0, 0, 0, 0, 2]);
        assert_eq!(config.channels().map(|(name, _)| name), ["aw", "w", "b", "ar", "r"]);
    }

    #[test]
    fn deserialize_mixed_forms() {
        let config: RegisterConfig =
            serde_json::from_str(r#"{ "aw_reg": "skid_buffer", "b_reg": 0, "r_reg": "SKID" }"#).unwrap();
        assert_eq!(config, RegisterConfig {
            aw: RegisterType::SkidBuffer,
            w: RegisterType::SimpleBuffer,
            b: RegisterType::Bypass,
            ar: RegisterType::SimpleBuffer,
            r: RegisterType::SkidBuffer,
        });

        assert!(serde_json::from_str::<RegisterConfig>(r#"{ "w_reg": 7 }"#).is_err());
    }
}
