// Literal `type` discriminators. Each marker serializes to exactly one string and refuses any
// other on the way in, so a `FormFieldBoolean` payload can never land in a `FormFieldInput`.

macro_rules! literal_tag {
    ($(#[$meta:meta])* $ident:ident => $lit:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $ident;

        impl $ident {
            pub const VALUE: &'static str = $lit;
        }

        impl ::serde::Serialize for $ident {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str($lit)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $ident {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> ::std::result::Result<Self, D::Error> {
                let value = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                if value == $lit {
                    Ok($ident)
                } else {
                    Err(::serde::de::Error::invalid_value(
                        ::serde::de::Unexpected::Str(&value),
                        &$lit,
                    ))
                }
            }
        }

        impl ::schemars::JsonSchema for $ident {
            fn inline_schema() -> bool {
                true
            }

            fn schema_name() -> ::std::borrow::Cow<'static, str> {
                stringify!($ident).into()
            }

            fn json_schema(_: &mut ::schemars::SchemaGenerator) -> ::schemars::Schema {
                ::schemars::json_schema!({
                    "type": "string",
                    "const": $lit,
                })
            }
        }
    };
}
