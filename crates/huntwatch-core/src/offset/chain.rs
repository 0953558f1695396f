use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::memory::ReadMemory;

/// A static module-relative address followed by pointer offsets.
///
/// Resolution reads an 8-byte pointer at `module_base + base`, then at
/// `pointer + offset` for every offset except the last, and finally adds the
/// last offset without dereferencing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerChain {
    #[serde(with = "hex::address")]
    pub base: u64,
    #[serde(with = "hex::offsets")]
    pub offsets: Vec<i64>,
}

impl PointerChain {
    pub fn new(base: u64, offsets: &[i64]) -> Self {
        Self {
            base,
            offsets: offsets.to_vec(),
        }
    }

    /// Resolve against the reader's module base.
    pub fn resolve<R: ReadMemory + ?Sized>(&self, reader: &R) -> Option<u64> {
        let steps = std::iter::once(self.base as i64).chain(self.offsets.iter().copied());
        resolve_steps(reader, reader.base_address(), steps)
    }
}

/// Walk `offsets` from `base`, dereferencing every step but the last.
///
/// Returns `None` when any intermediate read fails or yields a null pointer,
/// which is the normal signal for "entity not currently present". An empty
/// offset list resolves to `base` itself.
pub fn resolve<R: ReadMemory + ?Sized>(reader: &R, base: u64, offsets: &[i64]) -> Option<u64> {
    resolve_steps(reader, base, offsets.iter().copied())
}

fn resolve_steps<R, I>(reader: &R, base: u64, offsets: I) -> Option<u64>
where
    R: ReadMemory + ?Sized,
    I: IntoIterator<Item = i64>,
{
    let mut offsets = offsets.into_iter().peekable();
    let mut current = base;

    while let Some(offset) = offsets.next() {
        let address = current.checked_add_signed(offset)?;
        if offsets.peek().is_none() {
            return Some(address);
        }
        current = match reader.read_pointer(address) {
            Ok(pointer) => pointer,
            Err(e) => {
                trace!("Chain stopped: {}", e);
                return None;
            }
        };
    }

    Some(current)
}

/// Serde helpers writing addresses and offsets as hex strings.
///
/// Deserialization accepts plain JSON numbers as well.
mod hex {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    fn parse(raw: Raw) -> Result<i64, String> {
        match raw {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => {
                let s = s.trim();
                let (negative, digits) = match s.strip_prefix('-') {
                    Some(rest) => (true, rest),
                    None => (false, s),
                };
                let value = match digits
                    .strip_prefix("0x")
                    .or_else(|| digits.strip_prefix("0X"))
                {
                    Some(hex) => i64::from_str_radix(hex, 16),
                    None => digits.parse::<i64>(),
                }
                .map_err(|e| format!("invalid offset {:?}: {}", s, e))?;
                Ok(if negative { -value } else { value })
            }
        }
    }

    fn format(value: i64) -> String {
        if value < 0 {
            format!("-0x{:X}", value.unsigned_abs())
        } else {
            format!("0x{:X}", value)
        }
    }

    pub mod address {
        use super::*;
        use serde::de::Error as _;

        pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&format!("0x{:X}", value))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
            let value = parse(Raw::deserialize(deserializer)?).map_err(D::Error::custom)?;
            u64::try_from(value).map_err(|_| D::Error::custom("base address must not be negative"))
        }
    }

    pub mod offsets {
        use super::*;
        use serde::de::Error as _;
        use serde::ser::SerializeSeq;

        pub fn serialize<S: Serializer>(values: &[i64], serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(values.len()))?;
            for value in values {
                seq.serialize_element(&format(*value))?;
            }
            seq.end()
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<i64>, D::Error> {
            Vec::<Raw>::deserialize(deserializer)?
                .into_iter()
                .map(|raw| parse(raw).map_err(D::Error::custom))
                .collect()
        }
    }
}
