//! JSON text to token stream.
//!
//! Containers are walked through `serde_json` visitors rather than
//! materialized as a `serde_json::Value`, so object keys keep their document
//! order and repeated keys are all emitted. Every value is first captured as
//! a `RawValue`; numbers keep their literal source text.

use crate::token::{Scalar, Token, TokenError, TokenStream};
use serde::{
    Deserialize,
    de::{self, Deserializer, MapAccess, SeqAccess, Visitor},
};
use serde_json::value::RawValue;
use std::fmt;

/// Tokenize one complete JSON document.
pub fn tokenize(input: &str) -> Result<TokenStream, TokenError> {
    let mut de = serde_json::Deserializer::from_str(input);
    let root = <&RawValue>::deserialize(&mut de)
        .map_err(|err| TokenError::malformed(err.to_string()))?;
    de.end().map_err(|err| TokenError::trailing(err.to_string()))?;

    let mut tokens = Vec::new();
    push_value(root, &mut tokens)
        .map_err(|err| TokenError::malformed(err.to_string()))?;

    Ok(TokenStream::new(tokens))
}

/// Append the tokens of one value and all of its children.
fn push_value(raw: &RawValue, tokens: &mut Vec<Token>) -> Result<(), serde_json::Error> {
    let text = raw.get();

    match text.as_bytes().first() {
        Some(b'{') => {
            tokens.push(Token::StartObject);
            serde_json::Deserializer::from_str(text).deserialize_map(Entries {
                tokens: &mut *tokens,
            })?;
            tokens.push(Token::EndObject);
        }
        Some(b'[') => {
            tokens.push(Token::StartArray);
            serde_json::Deserializer::from_str(text).deserialize_seq(Entries {
                tokens: &mut *tokens,
            })?;
            tokens.push(Token::EndArray);
        }
        Some(b'"') => tokens.push(Token::Value(Scalar::Text(serde_json::from_str(text)?))),
        Some(b'-' | b'0'..=b'9') => tokens.push(Token::number(text)),
        _ => {
            let scalar = match text {
                "null" => Scalar::Null,
                "true" => Scalar::Bool(true),
                "false" => Scalar::Bool(false),
                other => {
                    return Err(de::Error::custom(format!(
                        "unexpected JSON value '{other}'"
                    )));
                }
            };
            tokens.push(Token::Value(scalar));
        }
    }

    Ok(())
}

///
/// Entries
/// Appends the children of one object or array to a token buffer.
///

struct Entries<'a> {
    tokens: &'a mut Vec<Token>,
}

impl<'de> Visitor<'de> for Entries<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object or array")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        while let Some(raw) = seq.next_element::<&'de RawValue>()? {
            push_value(raw, self.tokens).map_err(de::Error::custom)?;
        }

        Ok(())
    }

    fn visit_map<A>(self, mut map: A) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        while let Some(key) = map.next_key::<String>()? {
            self.tokens.push(Token::FieldName(key));
            let raw = map.next_value::<&'de RawValue>()?;
            push_value(raw, self.tokens).map_err(de::Error::custom)?;
        }

        Ok(())
    }
}

///
/// TESTS
///
