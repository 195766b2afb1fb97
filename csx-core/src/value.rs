//! Atomic values and type-tag classification.
//!
//! CSX carries a small closed set of schema scalar kinds. Anything outside
//! that set, and any lexical form that does not parse as its declared kind,
//! degrades to a plain string. Classification never fails.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use phf::phf_map;

/// Namespace of the schema built-in types.
const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// The kind of an [`AtomicValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomicKind {
    Boolean,
    Byte,
    Int,
    Long,
    Float,
    Double,
    String,
    /// Text taken from element content rather than an explicit typed value.
    Untyped,
}

/// Source type tags by local name. `anyAtomicType` is treated like
/// `untypedAtomic`.
static TYPE_TAGS: phf::Map<&'static str, AtomicKind> = phf_map! {
    "boolean" => AtomicKind::Boolean,
    "byte" => AtomicKind::Byte,
    "int" => AtomicKind::Int,
    "long" => AtomicKind::Long,
    "float" => AtomicKind::Float,
    "double" => AtomicKind::Double,
    "string" => AtomicKind::String,
    "untypedAtomic" => AtomicKind::Untyped,
    "anyAtomicType" => AtomicKind::Untyped,
};

impl AtomicKind {
    /// Look up a source type tag.
    ///
    /// Accepts the bare local name (`int`), the conventional prefixed forms
    /// (`xs:int`, `xsd:int`) and Clark notation
    /// (`{http://www.w3.org/2001/XMLSchema}int`).
    pub fn from_type_name(type_name: &str) -> Option<AtomicKind> {
        let local = if let Some(rest) = type_name.strip_prefix('{') {
            let (ns, local) = rest.split_once('}')?;
            if ns != XS_NAMESPACE {
                return None;
            }
            local
        } else if let Some(local) = type_name.strip_prefix("xs:") {
            local
        } else if let Some(local) = type_name.strip_prefix("xsd:") {
            local
        } else {
            type_name
        };
        TYPE_TAGS.get(local).copied()
    }

    /// The `xs:` type name for this kind.
    pub fn type_name(self) -> &'static str {
        match self {
            AtomicKind::Boolean => "xs:boolean",
            AtomicKind::Byte => "xs:byte",
            AtomicKind::Int => "xs:int",
            AtomicKind::Long => "xs:long",
            AtomicKind::Float => "xs:float",
            AtomicKind::Double => "xs:double",
            AtomicKind::String => "xs:string",
            AtomicKind::Untyped => "xs:untypedAtomic",
        }
    }
}

/// A scalar value as handed over by the host: a type tag and a lexical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAtomic<'a> {
    pub type_name: &'a str,
    pub lexical: &'a str,
}

impl<'a> RawAtomic<'a> {
    pub fn new(type_name: &'a str, lexical: &'a str) -> Self {
        RawAtomic { type_name, lexical }
    }
}

/// A typed scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum AtomicValue {
    Boolean(bool),
    Byte(i8),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// Character data from element content. Round-trips as text.
    Untyped(String),
}

impl AtomicValue {
    /// Classify a host scalar; see [`classify_atomic`].
    pub fn classify(type_name: &str, lexical: &str) -> AtomicValue {
        classify_atomic(RawAtomic::new(type_name, lexical))
    }

    pub fn kind(&self) -> AtomicKind {
        match self {
            AtomicValue::Boolean(_) => AtomicKind::Boolean,
            AtomicValue::Byte(_) => AtomicKind::Byte,
            AtomicValue::Int(_) => AtomicKind::Int,
            AtomicValue::Long(_) => AtomicKind::Long,
            AtomicValue::Float(_) => AtomicKind::Float,
            AtomicValue::Double(_) => AtomicKind::Double,
            AtomicValue::String(_) => AtomicKind::String,
            AtomicValue::Untyped(_) => AtomicKind::Untyped,
        }
    }

    #[inline]
    pub fn is_untyped(&self) -> bool {
        matches!(self, AtomicValue::Untyped(_))
    }

    /// Try to get the string payload of a `String` or `Untyped` value.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AtomicValue::String(s) | AtomicValue::Untyped(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as an integer, widening the narrower integer kinds.
    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AtomicValue::Byte(b) => Some(i64::from(*b)),
            AtomicValue::Int(i) => Some(i64::from(*i)),
            AtomicValue::Long(l) => Some(*l),
            _ => None,
        }
    }

    /// The canonical lexical form (`true`, `42`, `INF`, ...).
    pub fn lexical(&self) -> Cow<'_, str> {
        match self {
            AtomicValue::String(s) | AtomicValue::Untyped(s) => Cow::Borrowed(s),
            AtomicValue::Boolean(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            AtomicValue::Byte(v) => Cow::Owned(v.to_string()),
            AtomicValue::Int(v) => Cow::Owned(v.to_string()),
            AtomicValue::Long(v) => Cow::Owned(v.to_string()),
            AtomicValue::Float(v) => float_lexical(f64::from(*v), v.to_string()),
            AtomicValue::Double(v) => float_lexical(*v, v.to_string()),
        }
    }
}

fn float_lexical(v: f64, shortest: String) -> Cow<'static, str> {
    if v.is_nan() {
        Cow::Borrowed("NaN")
    } else if v == f64::INFINITY {
        Cow::Borrowed("INF")
    } else if v == f64::NEG_INFINITY {
        Cow::Borrowed("-INF")
    } else {
        Cow::Owned(shortest)
    }
}

impl fmt::Display for AtomicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lexical())
    }
}

impl From<bool> for AtomicValue {
    fn from(v: bool) -> Self {
        AtomicValue::Boolean(v)
    }
}

impl From<i8> for AtomicValue {
    fn from(v: i8) -> Self {
        AtomicValue::Byte(v)
    }
}

impl From<i32> for AtomicValue {
    fn from(v: i32) -> Self {
        AtomicValue::Int(v)
    }
}

impl From<i64> for AtomicValue {
    fn from(v: i64) -> Self {
        AtomicValue::Long(v)
    }
}

impl From<f32> for AtomicValue {
    fn from(v: f32) -> Self {
        AtomicValue::Float(v)
    }
}

impl From<f64> for AtomicValue {
    fn from(v: f64) -> Self {
        AtomicValue::Double(v)
    }
}

impl From<&str> for AtomicValue {
    fn from(v: &str) -> Self {
        AtomicValue::String(v.to_string())
    }
}

impl From<String> for AtomicValue {
    fn from(v: String) -> Self {
        AtomicValue::String(v)
    }
}

/// Map a host scalar onto an [`AtomicValue`].
///
/// Never fails: an unknown tag, or a lexical form that is
/// not valid for its tag, yields `AtomicValue::String` with the lexical form
/// unchanged.
pub fn classify_atomic(raw: RawAtomic<'_>) -> AtomicValue {
    let Some(kind) = AtomicKind::from_type_name(raw.type_name) else {
        return AtomicValue::String(raw.lexical.to_string());
    };

    parse_as(kind, raw.lexical).unwrap_or_else(|| AtomicValue::String(raw.lexical.to_string()))
}

fn parse_as(kind: AtomicKind, lexical: &str) -> Option<AtomicValue> {
    // Schema whitespace facet is "collapse" for every non-string kind.
    let trimmed = lexical.trim();
    match kind {
        AtomicKind::Boolean => match trimmed {
            "true" | "1" => Some(AtomicValue::Boolean(true)),
            "false" | "0" => Some(AtomicValue::Boolean(false)),
            _ => None,
        },
        AtomicKind::Byte => trimmed.parse().ok().map(AtomicValue::Byte),
        AtomicKind::Int => trimmed.parse().ok().map(AtomicValue::Int),
        AtomicKind::Long => trimmed.parse().ok().map(AtomicValue::Long),
        AtomicKind::Float => parse_float(trimmed).map(AtomicValue::Float),
        AtomicKind::Double => parse_float(trimmed).map(AtomicValue::Double),
        AtomicKind::String => Some(AtomicValue::String(lexical.to_string())),
        AtomicKind::Untyped => Some(AtomicValue::Untyped(lexical.to_string())),
    }
}

/// Schema float lexical forms, parsed straight into the target width.
fn parse_float<F: FromStr>(s: &str) -> Option<F> {
    let rust_form = match s {
        "INF" | "+INF" => "inf",
        "-INF" => "-inf",
        "NaN" => "NaN",
        // Rust also accepts "inf"/"infinity"; the schema forms above are the only spellings.
        _ if s.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') => return None,
        _ => s,
    };
    rust_form.parse().ok()
}
