//! Value codec registry: fixed datatype <-> native value conversions
//!
//! Every supported datatype IRI maps to a [`Codec`], a pair of plain
//! function pointers. The table is built once and never changes.

use crate::model::Literal;
use crate::vocab::{rdf, xsd};
use crate::CodecError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Identifies the codec family a datatype belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CodecId {
    String,
    LangString,
    Boolean,
    Integer,
    Decimal,
    Double,
    DateTime,
    Date,
    AnyUri,
}

impl CodecId {
    /// Codec for a datatype IRI, if the registry knows it
    pub fn for_datatype(datatype: &str) -> Option<CodecId> {
        REGISTRY.get(datatype).map(|codec| codec.id)
    }

    /// Datatype written when no more specific one is known
    pub fn canonical_datatype(self) -> &'static str {
        match self {
            CodecId::String => xsd::STRING,
            CodecId::LangString => rdf::LANG_STRING,
            CodecId::Boolean => xsd::BOOLEAN,
            CodecId::Integer => xsd::INTEGER,
            CodecId::Decimal => xsd::DECIMAL,
            CodecId::Double => xsd::DOUBLE,
            CodecId::DateTime => xsd::DATE_TIME,
            CodecId::Date => xsd::DATE,
            CodecId::AnyUri => xsd::ANY_URI,
        }
    }
}

impl fmt::Display for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Native representation of a decoded literal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum NativeValue {
    String(String),
    LangString { value: String, language: String },
    Boolean(bool),
    Integer(i64),
    /// Decimal lexical form; values compare by their canonical form
    Decimal(String),
    Double(f64),
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
    AnyUri(String),
}

impl NativeValue {
    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            NativeValue::String(_) => "string",
            NativeValue::LangString { .. } => "langString",
            NativeValue::Boolean(_) => "boolean",
            NativeValue::Integer(_) => "integer",
            NativeValue::Decimal(_) => "decimal",
            NativeValue::Double(_) => "double",
            NativeValue::DateTime(_) => "dateTime",
            NativeValue::Date(_) => "date",
            NativeValue::AnyUri(_) => "anyURI",
        }
    }

    /// Decimal from any valid lexical form, stored canonically
    pub fn decimal(lexical: &str) -> Result<Self, CodecError> {
        canonical_decimal(lexical)
            .map(NativeValue::Decimal)
            .ok_or_else(|| CodecError::InvalidLexicalForm {
                lexical: lexical.to_string(),
                datatype: xsd::DECIMAL.to_string(),
            })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NativeValue::String(s) | NativeValue::AnyUri(s) => Some(s),
            NativeValue::LangString { value, .. } => Some(value),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            NativeValue::String(_) => 0,
            NativeValue::LangString { .. } => 1,
            NativeValue::Boolean(_) => 2,
            NativeValue::Integer(_) => 3,
            NativeValue::Decimal(_) => 4,
            NativeValue::Double(_) => 5,
            NativeValue::DateTime(_) => 6,
            NativeValue::Date(_) => 7,
            NativeValue::AnyUri(_) => 8,
        }
    }
}

// Total order so decoded sets are deterministic; doubles use `total_cmp`.
// Decimals compare by canonical form, so `1.50` and `1.5` are one value.
impl Ord for NativeValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use NativeValue as V;
        match (self, other) {
            (V::String(a), V::String(b)) | (V::AnyUri(a), V::AnyUri(b)) => a.cmp(b),
            (V::Decimal(a), V::Decimal(b)) => decimal_key(a).cmp(&decimal_key(b)),
            (V::LangString { value: a, language: la }, V::LangString { value: b, language: lb }) => {
                (la, a).cmp(&(lb, b))
            }
            (V::Boolean(a), V::Boolean(b)) => a.cmp(b),
            (V::Integer(a), V::Integer(b)) => a.cmp(b),
            (V::Double(a), V::Double(b)) => a.total_cmp(b),
            (V::DateTime(a), V::DateTime(b)) => a.cmp(b),
            (V::Date(a), V::Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for NativeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NativeValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NativeValue {}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeValue::String(s) | NativeValue::Decimal(s) | NativeValue::AnyUri(s) => write!(f, "{}", s),
            NativeValue::LangString { value, language } => write!(f, "{}@{}", value, language),
            NativeValue::Boolean(b) => write!(f, "{}", b),
            NativeValue::Integer(i) => write!(f, "{}", i),
            NativeValue::Double(d) => write!(f, "{}", format_double(*d)),
            NativeValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            NativeValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<String> for NativeValue {
    fn from(value: String) -> Self {
        NativeValue::String(value)
    }
}

impl From<&str> for NativeValue {
    fn from(value: &str) -> Self {
        NativeValue::String(value.to_string())
    }
}

impl From<bool> for NativeValue {
    fn from(value: bool) -> Self {
        NativeValue::Boolean(value)
    }
}

impl From<i64> for NativeValue {
    fn from(value: i64) -> Self {
        NativeValue::Integer(value)
    }
}

impl From<i32> for NativeValue {
    fn from(value: i32) -> Self {
        NativeValue::Integer(value.into())
    }
}

impl From<f64> for NativeValue {
    fn from(value: f64) -> Self {
        NativeValue::Double(value)
    }
}

impl From<DateTime<FixedOffset>> for NativeValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        NativeValue::DateTime(value)
    }
}

impl From<DateTime<Utc>> for NativeValue {
    fn from(value: DateTime<Utc>) -> Self {
        NativeValue::DateTime(value.fixed_offset())
    }
}

impl From<NaiveDate> for NativeValue {
    fn from(value: NaiveDate) -> Self {
        NativeValue::Date(value)
    }
}

/// Conversion out of a decoded value into a Rust type
pub trait FromNative: Sized {
    fn from_native(value: NativeValue) -> Result<Self, CodecError>;
}

fn mismatch(expected: &str, found: &NativeValue) -> CodecError {
    CodecError::TypeMismatch {
        expected: expected.to_string(),
        found: found.kind().to_string(),
    }
}

impl FromNative for NativeValue {
    fn from_native(value: NativeValue) -> Result<Self, CodecError> {
        Ok(value)
    }
}

impl FromNative for String {
    fn from_native(value: NativeValue) -> Result<Self, CodecError> {
        match value {
            NativeValue::String(s) | NativeValue::AnyUri(s) => Ok(s),
            NativeValue::LangString { value, .. } => Ok(value),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl FromNative for bool {
    fn from_native(value: NativeValue) -> Result<Self, CodecError> {
        match value {
            NativeValue::Boolean(b) => Ok(b),
            other => Err(mismatch("boolean", &other)),
        }
    }
}

impl FromNative for i64 {
    fn from_native(value: NativeValue) -> Result<Self, CodecError> {
        match value {
            NativeValue::Integer(i) => Ok(i),
            other => Err(mismatch("integer", &other)),
        }
    }
}

impl FromNative for f64 {
    fn from_native(value: NativeValue) -> Result<Self, CodecError> {
        match value {
            NativeValue::Double(d) => Ok(d),
            NativeValue::Integer(i) => Ok(i as f64),
            other => Err(mismatch("double", &other)),
        }
    }
}

impl FromNative for DateTime<FixedOffset> {
    fn from_native(value: NativeValue) -> Result<Self, CodecError> {
        match value {
            NativeValue::DateTime(dt) => Ok(dt),
            other => Err(mismatch("dateTime", &other)),
        }
    }
}

impl FromNative for NaiveDate {
    fn from_native(value: NativeValue) -> Result<Self, CodecError> {
        match value {
            NativeValue::Date(d) => Ok(d),
            other => Err(mismatch("date", &other)),
        }
    }
}

/// Decode/encode function pair registered for a datatype
#[derive(Debug, Clone, Copy)]
pub struct Codec {
    pub id: CodecId,
    /// Lexical form -> native value
    pub decode: fn(&Literal) -> Result<NativeValue, CodecError>,
    /// Native value -> literal of the given datatype
    pub encode: fn(&str, &NativeValue) -> Result<Literal, CodecError>,
}

lazy_static! {
    static ref REGISTRY: HashMap<&'static str, Codec> = {
        let mut table = HashMap::new();

        let string = Codec { id: CodecId::String, decode: decode_string, encode: encode_string };
        for dt in [xsd::STRING, xsd::NORMALIZED_STRING, xsd::TOKEN] {
            table.insert(dt, string);
        }

        table.insert(rdf::LANG_STRING, Codec { id: CodecId::LangString, decode: decode_lang_string, encode: encode_lang_string });
        table.insert(xsd::BOOLEAN, Codec { id: CodecId::Boolean, decode: decode_boolean, encode: encode_boolean });

        let integer = Codec { id: CodecId::Integer, decode: decode_integer, encode: encode_integer };
        for dt in [
            xsd::INTEGER,
            xsd::INT,
            xsd::LONG,
            xsd::SHORT,
            xsd::BYTE,
            xsd::NON_NEGATIVE_INTEGER,
            xsd::POSITIVE_INTEGER,
            xsd::NEGATIVE_INTEGER,
            xsd::NON_POSITIVE_INTEGER,
            xsd::UNSIGNED_INT,
            xsd::UNSIGNED_LONG,
            xsd::UNSIGNED_SHORT,
            xsd::UNSIGNED_BYTE,
        ] {
            table.insert(dt, integer);
        }

        table.insert(xsd::DECIMAL, Codec { id: CodecId::Decimal, decode: decode_decimal, encode: encode_decimal });

        let double = Codec { id: CodecId::Double, decode: decode_double, encode: encode_double };
        table.insert(xsd::DOUBLE, double);
        table.insert(xsd::FLOAT, double);

        table.insert(xsd::DATE_TIME, Codec { id: CodecId::DateTime, decode: decode_date_time, encode: encode_date_time });
        table.insert(xsd::DATE, Codec { id: CodecId::Date, decode: decode_date, encode: encode_date });
        table.insert(xsd::ANY_URI, Codec { id: CodecId::AnyUri, decode: decode_any_uri, encode: encode_any_uri });

        table
    };
}

/// Look up the codec registered for a datatype
pub fn lookup(datatype: &str) -> Result<&'static Codec, CodecError> {
    REGISTRY.get(datatype).ok_or_else(|| CodecError::UnsupportedDatatype {
        datatype: datatype.to_string(),
    })
}

/// Every datatype IRI the registry knows
pub fn supported_datatypes() -> Vec<&'static str> {
    let mut datatypes: Vec<&'static str> = REGISTRY.keys().copied().collect();
    datatypes.sort_unstable();
    datatypes
}

/// Decode a literal using its own datatype
pub fn decode(literal: &Literal) -> Result<NativeValue, CodecError> {
    (lookup(&literal.datatype)?.decode)(literal)
}

/// Decode a literal that is expected to carry `datatype`
///
/// The literal's own datatype must belong to the same codec family as the
/// expected one, so an `xsd:int` literal reads fine through an
/// `xsd:integer` field but an `xsd:string` literal does not.
pub fn decode_as(datatype: &str, literal: &Literal) -> Result<NativeValue, CodecError> {
    let expected = lookup(datatype)?;
    let actual = lookup(&literal.datatype)?;
    if expected.id != actual.id {
        return Err(CodecError::TypeMismatch {
            expected: datatype.to_string(),
            found: literal.datatype.clone(),
        });
    }
    (actual.decode)(literal)
}

/// Encode a native value as a literal of `datatype`
pub fn encode(datatype: &str, value: &NativeValue) -> Result<Literal, CodecError> {
    (lookup(datatype)?.encode)(datatype, value)
}

fn invalid(literal: &Literal) -> CodecError {
    CodecError::InvalidLexicalForm {
        lexical: literal.lexical.clone(),
        datatype: literal.datatype.clone(),
    }
}

fn decode_string(literal: &Literal) -> Result<NativeValue, CodecError> {
    Ok(NativeValue::String(literal.lexical.clone()))
}

fn encode_string(datatype: &str, value: &NativeValue) -> Result<Literal, CodecError> {
    match value {
        NativeValue::String(s) => Ok(Literal::typed(s.clone(), datatype)),
        other => Err(mismatch(datatype, other)),
    }
}

fn decode_lang_string(literal: &Literal) -> Result<NativeValue, CodecError> {
    let language = literal.language.clone().ok_or_else(|| invalid(literal))?;
    Ok(NativeValue::LangString {
        value: literal.lexical.clone(),
        language,
    })
}

fn encode_lang_string(datatype: &str, value: &NativeValue) -> Result<Literal, CodecError> {
    match value {
        NativeValue::LangString { value, language } => Ok(Literal::lang_string(value.clone(), language.clone())),
        other => Err(mismatch(datatype, other)),
    }
}

fn decode_boolean(literal: &Literal) -> Result<NativeValue, CodecError> {
    match literal.lexical.trim() {
        "true" | "1" => Ok(NativeValue::Boolean(true)),
        "false" | "0" => Ok(NativeValue::Boolean(false)),
        _ => Err(invalid(literal)),
    }
}

fn encode_boolean(datatype: &str, value: &NativeValue) -> Result<Literal, CodecError> {
    match value {
        NativeValue::Boolean(b) => Ok(Literal::typed(b.to_string(), datatype)),
        other => Err(mismatch(datatype, other)),
    }
}

/// Value space bounds of the derived integer types
fn integer_in_range(datatype: &str, value: i64) -> bool {
    match datatype {
        xsd::INT => i32::try_from(value).is_ok(),
        xsd::SHORT => i16::try_from(value).is_ok(),
        xsd::BYTE => i8::try_from(value).is_ok(),
        xsd::NON_NEGATIVE_INTEGER | xsd::UNSIGNED_LONG => value >= 0,
        xsd::POSITIVE_INTEGER => value > 0,
        xsd::NEGATIVE_INTEGER => value < 0,
        xsd::NON_POSITIVE_INTEGER => value <= 0,
        xsd::UNSIGNED_INT => u32::try_from(value).is_ok(),
        xsd::UNSIGNED_SHORT => u16::try_from(value).is_ok(),
        xsd::UNSIGNED_BYTE => u8::try_from(value).is_ok(),
        _ => true,
    }
}

// Values are held as i64: integers beyond its range, including the upper
// half of xsd:unsignedLong, are rejected as invalid lexical forms.
fn decode_integer(literal: &Literal) -> Result<NativeValue, CodecError> {
    let value: i64 = literal.lexical.trim().parse().map_err(|_| invalid(literal))?;
    if !integer_in_range(&literal.datatype, value) {
        return Err(invalid(literal));
    }
    Ok(NativeValue::Integer(value))
}

fn encode_integer(datatype: &str, value: &NativeValue) -> Result<Literal, CodecError> {
    match value {
        NativeValue::Integer(i) if integer_in_range(datatype, *i) => Ok(Literal::typed(i.to_string(), datatype)),
        other => Err(mismatch(datatype, other)),
    }
}

/// Canonical decimal lexical form (`1.50` -> `1.5`, `007` -> `7.0`), or `None` if invalid
fn canonical_decimal(lexical: &str) -> Option<String> {
    let lexical = lexical.trim();
    let (negative, digits) = match lexical.as_bytes().first()? {
        b'-' => (true, &lexical[1..]),
        b'+' => (false, &lexical[1..]),
        _ => (false, lexical),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let int_part = int_part.trim_start_matches('0');
    let frac_part = frac_part.trim_end_matches('0');
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let frac_part = if frac_part.is_empty() { "0" } else { frac_part };
    let is_zero = int_part == "0" && frac_part == "0";

    Some(format!(
        "{}{}.{}",
        if negative && !is_zero { "-" } else { "" },
        int_part,
        frac_part
    ))
}

fn decimal_key(lexical: &str) -> Cow<'_, str> {
    canonical_decimal(lexical).map_or(Cow::Borrowed(lexical), Cow::Owned)
}

fn decode_decimal(literal: &Literal) -> Result<NativeValue, CodecError> {
    canonical_decimal(&literal.lexical)
        .map(NativeValue::Decimal)
        .ok_or_else(|| invalid(literal))
}

fn encode_decimal(datatype: &str, value: &NativeValue) -> Result<Literal, CodecError> {
    match value {
        NativeValue::Decimal(s) => canonical_decimal(s)
            .map(|canonical| Literal::typed(canonical, datatype))
            .ok_or_else(|| mismatch(datatype, value)),
        other => Err(mismatch(datatype, other)),
    }
}

fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        (if value > 0.0 { "INF" } else { "-INF" }).to_string()
    } else {
        value.to_string()
    }
}

fn decode_double(literal: &Literal) -> Result<NativeValue, CodecError> {
    let value = match literal.lexical.trim() {
        "NaN" => f64::NAN,
        "INF" | "+INF" => f64::INFINITY,
        "-INF" => f64::NEG_INFINITY,
        other => {
            // Rust accepts "inf"/"infinity" spellings that XSD does not
            if other.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
                return Err(invalid(literal));
            }
            other.parse().map_err(|_| invalid(literal))?
        }
    };
    if !fits_datatype(&literal.datatype, value) {
        return Err(invalid(literal));
    }
    Ok(NativeValue::Double(value))
}

/// Finite values of xsd:float must lie within f32 range
fn fits_datatype(datatype: &str, value: f64) -> bool {
    datatype != xsd::FLOAT || !value.is_finite() || value.abs() <= f64::from(f32::MAX)
}

fn encode_double(datatype: &str, value: &NativeValue) -> Result<Literal, CodecError> {
    match value {
        NativeValue::Double(d) if fits_datatype(datatype, *d) => Ok(Literal::typed(format_double(*d), datatype)),
        other => Err(mismatch(datatype, other)),
    }
}

fn decode_date_time(literal: &Literal) -> Result<NativeValue, CodecError> {
    let lexical = literal.lexical.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(lexical) {
        return Ok(NativeValue::DateTime(dt));
    }
    // Timezone-less values are read as UTC
    NaiveDateTime::parse_from_str(lexical, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| NativeValue::DateTime(naive.and_utc().fixed_offset()))
        .map_err(|_| invalid(literal))
}

fn encode_date_time(datatype: &str, value: &NativeValue) -> Result<Literal, CodecError> {
    match value {
        NativeValue::DateTime(dt) => Ok(Literal::typed(
            dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            datatype,
        )),
        other => Err(mismatch(datatype, other)),
    }
}

fn decode_date(literal: &Literal) -> Result<NativeValue, CodecError> {
    NaiveDate::parse_from_str(literal.lexical.trim(), "%Y-%m-%d")
        .map(NativeValue::Date)
        .map_err(|_| invalid(literal))
}

fn encode_date(datatype: &str, value: &NativeValue) -> Result<Literal, CodecError> {
    match value {
        NativeValue::Date(d) => Ok(Literal::typed(d.format("%Y-%m-%d").to_string(), datatype)),
        other => Err(mismatch(datatype, other)),
    }
}

fn decode_any_uri(literal: &Literal) -> Result<NativeValue, CodecError> {
    Ok(NativeValue::AnyUri(literal.lexical.clone()))
}

fn encode_any_uri(datatype: &str, value: &NativeValue) -> Result<Literal, CodecError> {
    match value {
        NativeValue::AnyUri(s) | NativeValue::String(s) => Ok(Literal::typed(s.clone(), datatype)),
        other => Err(mismatch(datatype, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_string() {
        let value = decode(&Literal::string("Alice")).unwrap();
        assert_eq!(value, NativeValue::String("Alice".to_string()));
    }

    #[test]
    fn test_decode_unsupported_datatype() {
        let lit = Literal::typed("x", "http://example.org/custom");
        assert!(matches!(decode(&lit), Err(CodecError::UnsupportedDatatype { .. })));
    }

    #[test]
    fn test_encode_type_mismatch() {
        let err = encode(xsd::INTEGER, &NativeValue::String("5".to_string())).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
    }

    #[test]
    fn test_integer_family_shares_codec() {
        let lit = Literal::typed("42", xsd::INT);
        assert_eq!(decode_as(xsd::INTEGER, &lit).unwrap(), NativeValue::Integer(42));
    }

    #[test]
    fn test_decode_as_rejects_other_family() {
        let lit = Literal::string("42");
        assert!(matches!(decode_as(xsd::INTEGER, &lit), Err(CodecError::TypeMismatch { .. })));
    }

    #[test]
    fn test_integer_subtype_range() {
        assert!(encode(xsd::NON_NEGATIVE_INTEGER, &NativeValue::Integer(-1)).is_err());
        assert!(decode(&Literal::typed("300", xsd::BYTE)).is_err());
        assert!(decode(&Literal::typed("abc", xsd::INTEGER)).is_err());
    }

    #[test]
    fn test_boolean_lexical_forms() {
        assert_eq!(decode(&Literal::typed("1", xsd::BOOLEAN)).unwrap(), NativeValue::Boolean(true));
        assert_eq!(decode(&Literal::typed("false", xsd::BOOLEAN)).unwrap(), NativeValue::Boolean(false));
        assert!(decode(&Literal::typed("yes", xsd::BOOLEAN)).is_err());
    }

    #[test]
    fn test_decimal_canonical_form() {
        assert_eq!(canonical_decimal("1.50").as_deref(), Some("1.5"));
        assert_eq!(canonical_decimal("007").as_deref(), Some("7.0"));
        assert_eq!(canonical_decimal("-0.00").as_deref(), Some("0.0"));
        assert_eq!(canonical_decimal(".5").as_deref(), Some("0.5"));
        assert_eq!(canonical_decimal("1e3"), None);
        assert_eq!(canonical_decimal("."), None);
    }

    #[test]
    fn test_decimal_equality_is_canonical() {
        let written = NativeValue::Decimal("1.50".to_string());
        let encoded = encode(xsd::DECIMAL, &written).unwrap();
        assert_eq!(encoded.lexical, "1.5");
        assert_eq!(decode(&encoded).unwrap(), written);
        assert_eq!(NativeValue::decimal("+01.500").unwrap(), written);
        assert!(NativeValue::decimal("1.5.0").is_err());
    }

    #[test]
    fn test_float_range() {
        let big = NativeValue::Double(1e300);
        assert!(encode(xsd::DOUBLE, &big).is_ok());
        assert!(matches!(encode(xsd::FLOAT, &big), Err(CodecError::TypeMismatch { .. })));
        assert!(encode(xsd::FLOAT, &NativeValue::Double(f64::INFINITY)).is_ok());
        assert!(decode(&Literal::typed("1e40", xsd::FLOAT)).is_err());
        assert_eq!(decode(&Literal::typed("1.5", xsd::FLOAT)).unwrap(), NativeValue::Double(1.5));
    }

    #[test]
    fn test_integer_beyond_i64_is_rejected() {
        let lit = Literal::typed("18446744073709551615", xsd::UNSIGNED_LONG);
        assert!(matches!(decode(&lit), Err(CodecError::InvalidLexicalForm { .. })));
    }

    #[test]
    fn test_double_special_values() {
        let inf = decode(&Literal::typed("INF", xsd::DOUBLE)).unwrap();
        assert_eq!(inf, NativeValue::Double(f64::INFINITY));
        assert!(decode(&Literal::typed("inf", xsd::DOUBLE)).is_err());
        let lit = encode(xsd::DOUBLE, &NativeValue::Double(f64::NAN)).unwrap();
        assert_eq!(lit.lexical, "NaN");
    }

    #[test]
    fn test_date_time_round_trip() {
        let lit = Literal::typed("2024-03-01T12:30:00+09:00", xsd::DATE_TIME);
        let value = decode(&lit).unwrap();
        let encoded = encode(xsd::DATE_TIME, &value).unwrap();
        assert_eq!(decode(&encoded).unwrap(), value);
    }

    #[test]
    fn test_date_time_without_offset_is_utc() {
        let value = decode(&Literal::typed("2024-03-01T12:30:00", xsd::DATE_TIME)).unwrap();
        match value {
            NativeValue::DateTime(dt) => assert_eq!(dt.offset().local_minus_utc(), 0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_lang_string_requires_tag() {
        let lit = Literal::typed("hello", rdf::LANG_STRING);
        assert!(matches!(decode(&lit), Err(CodecError::InvalidLexicalForm { .. })));
        let tagged = Literal::lang_string("hello", "en");
        assert_eq!(
            decode(&tagged).unwrap(),
            NativeValue::LangString { value: "hello".to_string(), language: "en".to_string() }
        );
    }

    #[test]
    fn test_native_value_order_is_total() {
        let mut values = vec![
            NativeValue::Double(f64::NAN),
            NativeValue::Integer(3),
            NativeValue::String("b".to_string()),
            NativeValue::Integer(1),
            NativeValue::String("a".to_string()),
        ];
        values.sort();
        assert_eq!(values[0], NativeValue::String("a".to_string()));
        assert_eq!(values[2], NativeValue::Integer(1));
        assert_eq!(values[4], NativeValue::Double(f64::NAN));
    }

    #[test]
    fn test_from_native_conversions() {
        assert_eq!(String::from_native(NativeValue::from("x")).unwrap(), "x");
        assert_eq!(i64::from_native(NativeValue::from(7i64)).unwrap(), 7);
        assert!(bool::from_native(NativeValue::from(1i64)).is_err());
    }

    #[test]
    fn test_supported_datatypes_sorted() {
        let datatypes = supported_datatypes();
        assert!(datatypes.contains(&xsd::STRING));
        assert!(datatypes.windows(2).all(|w| w[0] <= w[1]));
    }
}
