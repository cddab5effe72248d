//! Serde support: a [`FrozenBuf`] serializes as bytes and deserializes by
//! sealing the decoded byte vector.

use crate::FrozenBuf;
use serde::de::{Error, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl Serialize for FrozenBuf {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(self)
    }
}

impl<'de> Deserialize<'de> for FrozenBuf {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FrozenBufVisitor;

        impl<'de> Visitor<'de> for FrozenBufVisitor {
            type Value = FrozenBuf;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a byte buffer")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: Error,
            {
                Ok(FrozenBuf::from(v))
            }

            fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Self::Value, E>
            where
                E: Error,
            {
                Ok(FrozenBuf::from(v))
            }

            // Human-readable formats (JSON) represent bytes as a sequence
            // of integers.
            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(byte) = seq.next_element::<u8>()? {
                    bytes.push(byte);
                }
                Ok(FrozenBuf::from(bytes))
            }
        }

        deserializer.deserialize_bytes(FrozenBufVisitor)
    }
}

#[cfg(test)]
mod tests {
    use crate::FrozenBuf;

    #[test]
    fn json_round_trip() {
        let buf = FrozenBuf::new(3, |b| {
            b.set(0, &[1, 2, 3]).unwrap();
        })
        .unwrap();

        let json = serde_json::to_string(&buf).unwrap();
        assert_eq!(json, "[1,2,3]");

        let back: FrozenBuf = serde_json::from_str(&json).unwrap();
        assert_eq!(back, buf);
    }
}
