use super::types::PinStatusCode;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

const VARIANTS: &[&str] = &[
    "Ready", "SimPin", "SimPuk", "SimPin2", "SimPuk2", "PhNetPin", "PhSimPin",
];

impl Serialize for PinStatusCode {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Serializer::serialize_bytes(serializer, self.as_bytes())
    }
}

impl<'de> Deserialize<'de> for PinStatusCode {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Field(PinStatusCode);
        struct FieldVisitor;

        impl<'de> de::Visitor<'de> for FieldVisitor {
            type Value = Field;
            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                core::fmt::Formatter::write_str(formatter, "PIN status text")
            }

            fn visit_bytes<E>(self, value: &[u8]) -> core::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                PinStatusCode::from_bytes(value).map(Field).ok_or_else(|| {
                    let value = core::str::from_utf8(value).unwrap_or("\u{fffd}\u{fffd}\u{fffd}");
                    de::Error::unknown_variant(value, VARIANTS)
                })
            }

            fn visit_str<E>(self, value: &str) -> core::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                self.visit_bytes(value.as_bytes())
            }
        }

        impl<'de> Deserialize<'de> for Field {
            #[inline]
            fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserializer::deserialize_identifier(deserializer, FieldVisitor)
            }
        }

        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = PinStatusCode;
            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                core::fmt::Formatter::write_str(formatter, "enum PinStatusCode")
            }

            fn visit_enum<A>(self, data: A) -> core::result::Result<Self::Value, A::Error>
            where
                A: de::EnumAccess<'de>,
            {
                let (Field(code), _) = de::EnumAccess::variant(data)?;
                Ok(code)
            }
        }

        Deserializer::deserialize_enum(deserializer, "PinStatusCode", VARIANTS, Visitor)
    }
}
