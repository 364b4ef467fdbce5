// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Serde-specific utilities

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::decoder::Architecture;

/// [`Architecture`]s are (de)serialized as their tag
impl Serialize for Architecture {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for Architecture {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(ArchitectureVisitor)
    }
}

/// [`Visitor`][serde::de::Visitor] for parsing architecture tags
struct ArchitectureVisitor;

impl serde::de::Visitor<'_> for ArchitectureVisitor {
    type Value = Architecture;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "an architecture tag such as \"INTEL_PT\" or \"CORESIGHT_ETM\"")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        v.parse()
            .map_err(|_| E::invalid_value(serde::de::Unexpected::Str(v), &self))
    }
}
