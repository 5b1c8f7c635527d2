//! JSON form used by node RPC responses, with the script in base64.

use super::NefFile;
use crate::nef::MethodToken;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{
    de::{Error as DeError, MapAccess, Visitor},
    ser::SerializeStruct,
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt;

impl Serialize for NefFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("NefFile", 6)?;
        state.serialize_field("magic", &self.magic)?;
        state.serialize_field("compiler", &self.compiler)?;
        state.serialize_field("source", &self.source)?;
        state.serialize_field("tokens", &self.tokens)?;
        state.serialize_field("script", &BASE64.encode(&self.script))?;
        state.serialize_field("checksum", &self.checksum)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for NefFile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(field_identifier, rename_all = "lowercase")]
        enum Field {
            Magic,
            Compiler,
            Source,
            Tokens,
            Script,
            Checksum,
        }

        struct NefVisitor;

        impl<'de> Visitor<'de> for NefVisitor {
            type Value = NefFile;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("NEF file")
            }

            fn visit_map<M>(self, mut access: M) -> Result<NefFile, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut magic = None;
                let mut compiler: Option<String> = None;
                let mut source: Option<String> = None;
                let mut tokens: Option<Vec<MethodToken>> = None;
                let mut script = None;
                let mut checksum = None;
                while let Some(field) = access.next_key::<Field>()? {
                    match field {
                        Field::Magic => magic = Some(access.next_value()?),
                        Field::Compiler => compiler = Some(access.next_value()?),
                        Field::Source => source = Some(access.next_value()?),
                        Field::Tokens => tokens = Some(access.next_value()?),
                        Field::Script => {
                            let encoded: String = access.next_value()?;
                            let bytes = BASE64
                                .decode(encoded.trim().as_bytes())
                                .map_err(|err| DeError::custom(err.to_string()))?;
                            script = Some(bytes);
                        }
                        Field::Checksum => checksum = Some(access.next_value()?),
                    }
                }

                let nef = NefFile::from_parts(
                    magic.ok_or_else(|| DeError::missing_field("magic"))?,
                    compiler.ok_or_else(|| DeError::missing_field("compiler"))?,
                    source.unwrap_or_default(),
                    tokens.unwrap_or_default(),
                    script.ok_or_else(|| DeError::missing_field("script"))?,
                    checksum.ok_or_else(|| DeError::missing_field("checksum"))?,
                )
                .map_err(DeError::custom)?;
                if !nef.verify_checksum() {
                    return Err(DeError::custom("NEF checksum mismatch"));
                }
                Ok(nef)
            }
        }

        deserializer.deserialize_struct(
            "NefFile",
            &["magic", "compiler", "source", "tokens", "script", "checksum"],
            NefVisitor,
        )
    }
}
