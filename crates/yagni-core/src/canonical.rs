//! # Canonical Enums
//!
//! Closed sets of values with one canonical string per member. Rendering is
//! explicit ([`CanonicalEnum::as_str`] / `Display`); resolution from a string
//! ignores ASCII case but is otherwise exact, so `" male"` does not resolve
//! and `"ä"` does not resolve to a member labeled `"Ä"`.
//!
//! Enums are declared with [`canonical_enum!`](crate::canonical_enum), which
//! generates the enum, its [`CanonicalEnum`] impl, `Display`, `FromStr` and
//! serde impls, and refuses at compile time to build a definition whose
//! canonical strings collide under the same ASCII case folding that
//! resolution uses.
//!
//! ```
//! yagni_core::canonical_enum! {
//!     /// Grammatical gender.
//!     pub enum Gender {
//!         Male => "male",
//!         Female => "female",
//!     }
//! }
//!
//! use yagni_core::CanonicalEnum;
//!
//! assert_eq!(Gender::resolve("mAlE").unwrap(), Gender::Male);
//! assert_eq!(Gender::Female.to_string(), "female");
//! assert!(Gender::resolve("helicopter").is_err());
//! ```

use crate::error::ValidationError;

/// A closed set of members, each with a canonical string.
pub trait CanonicalEnum: Sized + Copy + 'static {
    /// Type name reported in errors.
    const TYPE_NAME: &'static str;

    /// Every member, in declaration order.
    const MEMBERS: &'static [Self];

    /// The canonical string for this member.
    fn as_str(&self) -> &'static str;

    /// Resolve `input` to the member whose canonical string equals it
    /// ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoSuchMember`] if nothing matches.
    fn resolve(input: &str) -> Result<Self, ValidationError> {
        Self::MEMBERS
            .iter()
            .copied()
            .find(|member| member.as_str().eq_ignore_ascii_case(input))
            .ok_or_else(|| {
                tracing::debug!(type_name = Self::TYPE_NAME, "no enum member matches input");
                ValidationError::NoSuchMember {
                    type_name: Self::TYPE_NAME,
                    input: input.to_string(),
                }
            })
    }
}

/// Whether two of `labels` are equal under ASCII case folding.
///
/// Evaluated in a `const` context by [`canonical_enum!`](crate::canonical_enum).
pub const fn has_duplicate_labels(labels: &[&str]) -> bool {
    let mut i = 0;
    while i < labels.len() {
        let mut j = i + 1;
        while j < labels.len() {
            if eq_ignore_ascii_case(labels[i].as_bytes(), labels[j].as_bytes()) {
                return true;
            }
            j += 1;
        }
        i += 1;
    }
    false
}

const fn eq_ignore_ascii_case(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut k = 0;
    while k < a.len() {
        if a[k].to_ascii_lowercase() != b[k].to_ascii_lowercase() {
            return false;
        }
        k += 1;
    }
    true
}

/// Declare a [`CanonicalEnum`].
///
/// Each variant is written `Variant => "canonical"`. Attributes on the enum
/// and on variants (including doc comments) are passed through.
#[macro_export]
macro_rules! canonical_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $canonical:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        const _: () = assert!(
            !$crate::canonical::has_duplicate_labels(&[$($canonical),+]),
            "canonical strings must be unique ignoring case"
        );

        impl $crate::CanonicalEnum for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            const MEMBERS: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $canonical,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::CanonicalEnum::as_str(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::ValidationError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                <Self as $crate::CanonicalEnum>::resolve(s)
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                serializer.serialize_str($crate::CanonicalEnum::as_str(self))
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let raw = <::std::string::String as $crate::__private::serde::Deserialize>::deserialize(
                    deserializer,
                )?;
                <Self as $crate::CanonicalEnum>::resolve(&raw)
                    .map_err(<D::Error as $crate::__private::serde::de::Error>::custom)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::canonical_enum! {
        /// Grammatical gender.
        pub enum Gender {
            /// Masculine.
            Male => "male",
            Female => "female",
        }
    }

    crate::canonical_enum! {
        enum Protocol {
            Http => "HTTP",
            WebSocket => "WebSocket",
        }
    }

    #[test]
    fn renders_canonical_string() {
        assert_eq!(Gender::Male.as_str(), "male");
        assert_eq!(Gender::Female.to_string(), "female");
        assert_eq!(format!("{}", Protocol::WebSocket), "WebSocket");
    }

    #[test]
    fn resolves_any_case() {
        assert_eq!(Gender::resolve("mAlE").unwrap(), Gender::Male);
        assert_eq!(Gender::resolve("FEMALE").unwrap(), Gender::Female);
        assert_eq!(Protocol::resolve("websocket").unwrap(), Protocol::WebSocket);
        assert_eq!("http".parse::<Protocol>().unwrap(), Protocol::Http);
    }

    #[test]
    fn rejects_non_member() {
        let err = Gender::resolve("helicopter").unwrap_err();
        assert_eq!(
            err,
            ValidationError::NoSuchMember {
                type_name: "Gender",
                input: "helicopter".to_string(),
            }
        );
        assert_eq!(err.to_string(), "\"helicopter\" is not a valid Gender");
    }

    #[test]
    fn does_not_trim() {
        assert!(Gender::resolve(" male").is_err());
        assert!(Gender::resolve("male ").is_err());
        assert!(Gender::resolve("").is_err());
    }

    #[test]
    fn members_in_declaration_order() {
        assert_eq!(Gender::MEMBERS, &[Gender::Male, Gender::Female]);
        assert_eq!(Gender::TYPE_NAME, "Gender");
    }

    crate::canonical_enum! {
        enum Umlaut {
            Upper => "Ä",
            Lower => "ä",
        }
    }

    #[test]
    fn non_ascii_labels_are_distinct_members() {
        assert_eq!(Umlaut::resolve("Ä").unwrap(), Umlaut::Upper);
        assert_eq!(Umlaut::resolve("ä").unwrap(), Umlaut::Lower);
        assert!(!has_duplicate_labels(&["Ä", "ä"]));
    }

    #[test]
    fn ascii_case_folds_inside_non_ascii_labels() {
        crate::canonical_enum! {
            enum City {
                Zurich => "Zürich",
            }
        }
        assert_eq!(City::resolve("ZüRICH").unwrap(), City::Zurich);
        assert!(City::resolve("zÜRICH").is_err());
    }

    #[test]
    fn duplicate_detection() {
        assert!(!has_duplicate_labels(&[]));
        assert!(!has_duplicate_labels(&["male", "female"]));
        assert!(has_duplicate_labels(&["male", "female", "MALE"]));
        assert!(!has_duplicate_labels(&["ab", "abc"]));
    }

    #[test]
    fn serde_uses_canonical_string() {
        assert_eq!(serde_json::to_string(&Gender::Male).unwrap(), "\"male\"");
        let parsed: Gender = serde_json::from_str("\"FeMaLe\"").unwrap();
        assert_eq!(parsed, Gender::Female);
        assert!(serde_json::from_str::<Gender>("\"helicopter\"").is_err());
    }
}
