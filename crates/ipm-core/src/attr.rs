// ── Tri-state attribute values ──
//
// Every declared attribute is one of three things: null (not written in
// the configuration), unknown (written, but its value is only known after
// apply), or a known value. Server data may fill unknown and
// computed-only attributes; it never turns a null into a value.
//
// On the JSON seam null is `null` (or an absent key) and unknown is the
// string sentinel below.

use std::fmt;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Placeholder the host writes for values that are unknown until apply.
pub const UNKNOWN: &str = "74D93920-ED26-11E3-AC10-0800200C9A66";

#[derive(Clone, Default, PartialEq, Eq)]
pub enum Attr<T> {
    #[default]
    Null,
    Unknown,
    Known(T),
}

impl<T> Attr<T> {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Value for a computed-only attribute: whatever the server reported.
    pub fn computed(server: Option<T>) -> Self {
        server.map_or(Self::Null, Self::Known)
    }

    /// Value for a declared attribute after a server round-trip.
    ///
    /// Null stays null. Unknown takes the server value, or becomes null
    /// when the server has none. Known takes the server value and keeps
    /// its own when the server omits the field.
    pub fn refresh(&self, server: Option<T>) -> Self
    where
        T: Clone,
    {
        match self {
            Self::Null => Self::Null,
            Self::Unknown => Self::computed(server),
            Self::Known(own) => Self::Known(server.unwrap_or_else(|| own.clone())),
        }
    }

    /// The planned value, if it is known and differs from `prior`.
    pub fn changed_from(&self, prior: &Self) -> Option<&T>
    where
        T: PartialEq,
    {
        match (self, prior) {
            (Self::Known(new), Self::Known(old)) if new == old => None,
            (Self::Known(new), _) => Some(new),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Attr<&T> {
        match self {
            Self::Null => Attr::Null,
            Self::Unknown => Attr::Unknown,
            Self::Known(v) => Attr::Known(v),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Attr<U> {
        match self {
            Self::Null => Attr::Null,
            Self::Unknown => Attr::Unknown,
            Self::Known(v) => Attr::Known(f(v)),
        }
    }
}

impl Attr<String> {
    pub fn as_deref(&self) -> Option<&str> {
        self.known().map(String::as_str)
    }
}

// Outer: declared? Inner: computed yet?
impl<T> From<Option<Option<T>>> for Attr<T> {
    fn from(value: Option<Option<T>>) -> Self {
        match value {
            None => Self::Null,
            Some(None) => Self::Unknown,
            Some(Some(v)) => Self::Known(v),
        }
    }
}

impl<T> From<Attr<T>> for Option<Option<T>> {
    fn from(value: Attr<T>) -> Self {
        match value {
            Attr::Null => None,
            Attr::Unknown => Some(None),
            Attr::Known(v) => Some(Some(v)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Attr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Unknown => f.write_str("Unknown"),
            Self::Known(v) => f.debug_tuple("Known").field(v).finish(),
        }
    }
}

// ── Serde ────────────────────────────────────────────────────────────

impl<T: Serialize> Serialize for Attr<T> {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => s.serialize_none(),
            Self::Unknown => s.serialize_str(UNKNOWN),
            Self::Known(v) => v.serialize(s),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Attr<T> {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(Self::Null),
            Value::String(s) if s == UNKNOWN => Ok(Self::Unknown),
            other => T::deserialize(other).map(Self::Known).map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    struct Probe {
        name: Attr<String>,
        capacity: Attr<i64>,
    }

    #[test]
    fn json_seam_distinguishes_three_levels() {
        let probe: Probe = serde_json::from_value(json!({"name": UNKNOWN})).unwrap();
        assert!(probe.name.is_unknown());
        assert!(probe.capacity.is_null());

        let probe: Probe =
            serde_json::from_value(json!({"name": "nc1", "capacity": null})).unwrap();
        assert_eq!(probe.name, Attr::Known("nc1".to_owned()));
        assert!(probe.capacity.is_null());

        let back = serde_json::to_value(Probe {
            name: Attr::Unknown,
            capacity: Attr::Known(100),
        })
        .unwrap();
        assert_eq!(back, json!({"name": UNKNOWN, "capacity": 100}));
    }

    #[test]
    fn refresh_never_fills_null() {
        let null: Attr<String> = Attr::Null;
        assert_eq!(null.refresh(Some("server".into())), Attr::Null);
    }

    #[test]
    fn refresh_resolves_unknown() {
        let unknown: Attr<i64> = Attr::Unknown;
        assert_eq!(unknown.refresh(Some(100)), Attr::Known(100));
        assert_eq!(unknown.refresh(None), Attr::Null);
    }

    #[test]
    fn refresh_prefers_server_over_known() {
        let known = Attr::Known("nc1".to_owned());
        assert_eq!(known.refresh(Some("nc2".into())), Attr::Known("nc2".into()));
        assert_eq!(known.refresh(None), Attr::Known("nc1".into()));
    }

    #[test]
    fn computed_takes_server_value() {
        assert_eq!(Attr::computed(Some(1)), Attr::Known(1));
        assert_eq!(Attr::<i64>::computed(None), Attr::Null);
    }

    #[test]
    fn changed_from_requires_known_plan() {
        let prior = Attr::Known("nc1".to_owned());
        assert_eq!(
            Attr::Known("nc2".to_owned()).changed_from(&prior),
            Some(&"nc2".to_owned())
        );
        assert_eq!(Attr::Known("nc1".to_owned()).changed_from(&prior), None);
        assert_eq!(Attr::<String>::Null.changed_from(&prior), None);
        assert_eq!(Attr::<String>::Unknown.changed_from(&prior), None);
        assert_eq!(
            Attr::Known("x".to_owned()).changed_from(&Attr::Null),
            Some(&"x".to_owned())
        );
    }

    #[test]
    fn option_of_option_round_trip() {
        let a: Attr<i64> = Some(None).into();
        assert!(a.is_unknown());
        let back: Option<Option<i64>> = Attr::Known(3).into();
        assert_eq!(back, Some(Some(3)));
    }
}
