use {
    ruint::Uint,
    serde::{
        Deserializer,
        Serializer,
        de::{self, Visitor},
    },
    serde_with::{DeserializeAs, SerializeAs},
    std::{fmt, marker::PhantomData},
};

/// Serialize an unsigned integer of any width ([`alloy::primitives::U256`],
/// [`alloy::primitives::aliases::U160`], ...) as a decimal string and
/// deserialize it from a decimal string, a `0x` prefixed hex string or a plain
/// integer.
///
/// Big amounts (token budgets, block numbers past `u64::MAX`) do not fit into
/// TOML or JSON integers, hence the string encodings.
pub struct HexOrDecimal;

impl<'de, const BITS: usize, const LIMBS: usize> DeserializeAs<'de, Uint<BITS, LIMBS>>
    for HexOrDecimal
{
    fn deserialize_as<D>(deserializer: D) -> Result<Uint<BITS, LIMBS>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct UintVisitor<const BITS: usize, const LIMBS: usize>(PhantomData<Uint<BITS, LIMBS>>);

        impl<const BITS: usize, const LIMBS: usize> Visitor<'_> for UintVisitor<BITS, LIMBS> {
            type Value = Uint<BITS, LIMBS>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(
                    formatter,
                    "a u{BITS} encoded either as 0x hex prefixed or decimal encoded string"
                )
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let s = s.trim();
                if let Some(hex) = s.strip_prefix("0x") {
                    Uint::from_str_radix(hex, 16).map_err(|err| {
                        E::custom(format!("failed to decode {s:?} as hex u{BITS}: {err}"))
                    })
                } else {
                    Uint::from_str_radix(s, 10).map_err(|err| {
                        E::custom(format!("failed to decode {s:?} as decimal u{BITS}: {err}"))
                    })
                }
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Uint::try_from(v)
                    .map_err(|_| E::custom(format!("{v} does not fit into a u{BITS}")))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let v = u64::try_from(v)
                    .map_err(|_| E::custom(format!("{v} is negative, expected a u{BITS}")))?;
                self.visit_u64(v)
            }
        }

        deserializer.deserialize_any(UintVisitor(PhantomData))
    }
}

impl<const BITS: usize, const LIMBS: usize> SerializeAs<Uint<BITS, LIMBS>> for HexOrDecimal {
    fn serialize_as<S>(source: &Uint<BITS, LIMBS>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&source.to_string())
    }
}
