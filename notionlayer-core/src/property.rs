//! Property codec: converters between [`FieldValue`]s and wire properties.
//!
//! The remote store describes every property value as a tagged object,
//! `{ "type": "<tag>", "<tag>": <body> }`. [`WireProperty`] models that shape as a closed
//! enum, and one [`PropertyConverter`] per [`PropertyType`] translates a single field value
//! in either direction.
//!
//! # Dispatch
//!
//! Declared type names are resolved on every call through [`converter_for`], which maps the
//! name onto a [`PropertyType`] and from there onto a static converter. Unknown names fail
//! with [`MapperError::UnsupportedType`] and never yield a converter.
//!
//! Supporting a new type means adding one [`PropertyType`] variant, one [`WireProperty`]
//! variant, one converter and one arm in [`PropertyType::converter`].
//!
//! # Example
//!
//! ```ignore
//! use notionlayer_core::{property, value::FieldValue};
//!
//! let wire = property::serialize("number", &FieldValue::Number(4.5))?;
//! assert_eq!(property::deserialize("number", &wire)?, FieldValue::Number(4.5));
//! ```

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::{fmt, str::FromStr};

use crate::{
    error::{MapperError, MapperResult},
    value::FieldValue,
};

/// The declared property types this crate knows how to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Checkbox,
    Date,
    Number,
    Title,
    RichText,
}

impl PropertyType {
    /// Every supported type, in declaration order.
    pub const ALL: [PropertyType; 5] = [
        PropertyType::Checkbox,
        PropertyType::Date,
        PropertyType::Number,
        PropertyType::Title,
        PropertyType::RichText,
    ];

    /// The tag the store uses for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Checkbox => "checkbox",
            PropertyType::Date => "date",
            PropertyType::Number => "number",
            PropertyType::Title => "title",
            PropertyType::RichText => "rich_text",
        }
    }

    /// Dispatch table from declared type to its converter.
    pub fn converter(&self) -> &'static dyn PropertyConverter {
        match self {
            PropertyType::Checkbox => &CheckboxConverter,
            PropertyType::Date => &DateConverter,
            PropertyType::Number => &NumberConverter,
            PropertyType::Title => &TitleConverter,
            PropertyType::RichText => &RichTextConverter,
        }
    }

    /// Empty property definition for this type, as used when describing a property to the store.
    pub fn schema(&self) -> Value {
        json!({
            "type": self.as_str(),
            self.as_str(): {},
        })
    }
}

impl FromStr for PropertyType {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| MapperError::UnsupportedType(s.to_string()))
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field's value as exchanged with the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireProperty {
    Checkbox { checkbox: bool },
    Date { date: Option<DateRange> },
    Number { number: Option<f64> },
    Title { title: Vec<RichTextRun> },
    RichText { rich_text: Vec<RichTextRun> },
}

impl WireProperty {
    pub fn property_type(&self) -> PropertyType {
        match self {
            WireProperty::Checkbox { .. } => PropertyType::Checkbox,
            WireProperty::Date { .. } => PropertyType::Date,
            WireProperty::Number { .. } => PropertyType::Number,
            WireProperty::Title { .. } => PropertyType::Title,
            WireProperty::RichText { .. } => PropertyType::RichText,
        }
    }

    /// Decodes a raw property object as returned by the store.
    ///
    /// The `type` tag is resolved first so that properties of unsupported types fail with
    /// [`MapperError::UnsupportedType`] rather than a generic decoding error.
    pub fn from_json(value: &Value) -> MapperResult<Self> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| MapperError::Serialization("property object has no type tag".into()))?;
        tag.parse::<PropertyType>()?;

        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn to_json(&self) -> MapperResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Body of a `date` property. Only the start of the range is read or written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
}

/// A single run of rich text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextRun {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<String>,
}

impl RichTextRun {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            text: Some(TextContent {
                content: content.into(),
            }),
            plain_text: None,
        }
    }

    /// The run's text, falling back to the rendered plain text for non-text runs.
    pub fn content(&self) -> &str {
        self.text
            .as_ref()
            .map(|t| t.content.as_str())
            .or(self.plain_text.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
}

/// Symmetric conversion between one field value and its wire property.
pub trait PropertyConverter: Send + Sync {
    /// The declared type this converter handles.
    fn property_type(&self) -> PropertyType;

    /// Converts an application value into its wire property.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::TypeMismatch`] if the value's variant does not fit the type, and
    /// [`MapperError::Serialization`] for values with no wire form, such as non-finite numbers.
    fn serialize(&self, value: &FieldValue) -> MapperResult<WireProperty>;

    /// Converts a wire property back into an application value.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::TypeMismatch`] if the wire property carries a different tag.
    fn deserialize(&self, wire: &WireProperty) -> MapperResult<FieldValue>;
}

/// Resolves a declared type name to its converter.
///
/// # Errors
///
/// Returns [`MapperError::UnsupportedType`] naming the type if no converter is registered.
pub fn converter_for(declared_type: &str) -> MapperResult<&'static dyn PropertyConverter> {
    Ok(declared_type.parse::<PropertyType>()?.converter())
}

/// Serializes `value` as a property of the given declared type.
pub fn serialize(declared_type: &str, value: &FieldValue) -> MapperResult<WireProperty> {
    converter_for(declared_type)?.serialize(value)
}

/// Deserializes `wire` as a property of the given declared type.
pub fn deserialize(declared_type: &str, wire: &WireProperty) -> MapperResult<FieldValue> {
    converter_for(declared_type)?.deserialize(wire)
}

fn unexpected_value(expected: PropertyType, value: &FieldValue) -> MapperError {
    MapperError::mismatch(expected.as_str(), value.kind())
}

fn unexpected_wire(expected: PropertyType, wire: &WireProperty) -> MapperError {
    MapperError::mismatch(expected.as_str(), wire.property_type().as_str())
}

/// Formats a timestamp the way the store expects: UTC, millisecond precision, `Z` suffix.
///
/// Sub-millisecond precision is truncated, so a timestamp such as `Utc::now()` reads back
/// only equal to the millisecond.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a range start, accepting RFC 3339 date-times and bare dates (midnight UTC).
pub fn parse_date(start: &str) -> MapperResult<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(start) {
        return Ok(date.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .ok_or_else(|| MapperError::Serialization(format!("Invalid date [{start}]")))
}

fn first_run(runs: &[RichTextRun]) -> FieldValue {
    // Only the first run is read; multi-run text is truncated.
    FieldValue::Text(
        runs.first()
            .map(|run| run.content().to_string())
            .unwrap_or_default(),
    )
}

fn single_run(value: &FieldValue, expected: PropertyType) -> MapperResult<Vec<RichTextRun>> {
    match value {
        FieldValue::Text(text) => Ok(vec![RichTextRun::new(text.clone())]),
        other => Err(unexpected_value(expected, other)),
    }
}

pub struct CheckboxConverter;

impl PropertyConverter for CheckboxConverter {
    fn property_type(&self) -> PropertyType {
        PropertyType::Checkbox
    }

    fn serialize(&self, value: &FieldValue) -> MapperResult<WireProperty> {
        match value {
            FieldValue::Bool(checkbox) => Ok(WireProperty::Checkbox {
                checkbox: *checkbox,
            }),
            other => Err(unexpected_value(PropertyType::Checkbox, other)),
        }
    }

    fn deserialize(&self, wire: &WireProperty) -> MapperResult<FieldValue> {
        match wire {
            WireProperty::Checkbox { checkbox } => Ok(FieldValue::Bool(*checkbox)),
            other => Err(unexpected_wire(PropertyType::Checkbox, other)),
        }
    }
}

pub struct DateConverter;

impl PropertyConverter for DateConverter {
    fn property_type(&self) -> PropertyType {
        PropertyType::Date
    }

    fn serialize(&self, value: &FieldValue) -> MapperResult<WireProperty> {
        match value {
            FieldValue::Date(date) => Ok(WireProperty::Date {
                date: Some(DateRange {
                    start: format_date(date),
                }),
            }),
            FieldValue::Null => Ok(WireProperty::Date { date: None }),
            other => Err(unexpected_value(PropertyType::Date, other)),
        }
    }

    fn deserialize(&self, wire: &WireProperty) -> MapperResult<FieldValue> {
        match wire {
            WireProperty::Date { date: Some(range) } => Ok(FieldValue::Date(parse_date(&range.start)?)),
            WireProperty::Date { date: None } => Ok(FieldValue::Null),
            other => Err(unexpected_wire(PropertyType::Date, other)),
        }
    }
}

pub struct NumberConverter;

impl PropertyConverter for NumberConverter {
    fn property_type(&self) -> PropertyType {
        PropertyType::Number
    }

    fn serialize(&self, value: &FieldValue) -> MapperResult<WireProperty> {
        match value {
            FieldValue::Number(number) if !number.is_finite() => Err(MapperError::Serialization(
                format!("Number [{number}] cannot be represented in JSON"),
            )),
            FieldValue::Number(number) => Ok(WireProperty::Number {
                number: Some(*number),
            }),
            FieldValue::Null => Ok(WireProperty::Number { number: None }),
            other => Err(unexpected_value(PropertyType::Number, other)),
        }
    }

    fn deserialize(&self, wire: &WireProperty) -> MapperResult<FieldValue> {
        match wire {
            WireProperty::Number { number } => Ok((*number).into()),
            other => Err(unexpected_wire(PropertyType::Number, other)),
        }
    }
}

pub struct TitleConverter;

impl PropertyConverter for TitleConverter {
    fn property_type(&self) -> PropertyType {
        PropertyType::Title
    }

    fn serialize(&self, value: &FieldValue) -> MapperResult<WireProperty> {
        Ok(WireProperty::Title {
            title: single_run(value, PropertyType::Title)?,
        })
    }

    fn deserialize(&self, wire: &WireProperty) -> MapperResult<FieldValue> {
        match wire {
            WireProperty::Title { title } => Ok(first_run(title)),
            other => Err(unexpected_wire(PropertyType::Title, other)),
        }
    }
}

pub struct RichTextConverter;

impl PropertyConverter for RichTextConverter {
    fn property_type(&self) -> PropertyType {
        PropertyType::RichText
    }

    fn serialize(&self, value: &FieldValue) -> MapperResult<WireProperty> {
        Ok(WireProperty::RichText {
            rich_text: single_run(value, PropertyType::RichText)?,
        })
    }

    fn deserialize(&self, wire: &WireProperty) -> MapperResult<FieldValue> {
        match wire {
            WireProperty::RichText { rich_text } => Ok(first_run(rich_text)),
            other => Err(unexpected_wire(PropertyType::RichText, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn round_trip(declared_type: &str, value: FieldValue) {
        let wire = serialize(declared_type, &value).unwrap();
        assert_eq!(deserialize(declared_type, &wire).unwrap(), value);
    }

    #[test]
    fn round_trips_every_supported_type() {
        round_trip("checkbox", FieldValue::Bool(true));
        round_trip("checkbox", FieldValue::Bool(false));
        round_trip("number", FieldValue::Number(4.5));
        round_trip("number", FieldValue::Number(-12.0));
        round_trip("number", FieldValue::Null);
        round_trip("title", FieldValue::Text("Coffee".into()));
        round_trip("rich_text", FieldValue::Text("Paid with card".into()));
        // Whole-millisecond timestamps only; finer precision is truncated on the wire
        round_trip(
            "date",
            FieldValue::Date(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()),
        );
        round_trip("date", FieldValue::Null);
    }

    #[test]
    fn truncates_dates_to_milliseconds() {
        let date = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let wire = serialize("date", &date.into()).unwrap();

        assert_eq!(
            wire.to_json().unwrap(),
            json!({ "type": "date", "date": { "start": "2023-11-14T22:13:20.123Z" } })
        );
        assert_eq!(
            deserialize("date", &wire).unwrap(),
            FieldValue::Date(Utc.timestamp_opt(1_700_000_000, 123_000_000).unwrap())
        );
    }

    #[test]
    fn empty_date_serializes_to_null_body() {
        let wire = serialize("date", &FieldValue::Null).unwrap().to_json().unwrap();
        assert_eq!(wire, json!({ "type": "date", "date": null }));
    }

    #[test]
    fn rejects_non_finite_numbers() {
        for number in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                serialize("number", &FieldValue::Number(number)),
                Err(MapperError::Serialization(_))
            ));
        }
    }

    #[test]
    fn serializes_to_tagged_wire_shape() {
        let title = serialize("title", &"Coffee".into()).unwrap().to_json().unwrap();
        assert_eq!(
            title,
            json!({ "type": "title", "title": [{ "text": { "content": "Coffee" } }] })
        );

        let text = serialize("rich_text", &"note".into()).unwrap().to_json().unwrap();
        assert_eq!(
            text,
            json!({ "type": "rich_text", "rich_text": [{ "text": { "content": "note" } }] })
        );

        let number = serialize("number", &FieldValue::Null).unwrap().to_json().unwrap();
        assert_eq!(number, json!({ "type": "number", "number": null }));

        let checkbox = serialize("checkbox", &true.into()).unwrap().to_json().unwrap();
        assert_eq!(checkbox, json!({ "type": "checkbox", "checkbox": true }));
    }

    #[test]
    fn formats_dates_as_utc_millis() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let wire = serialize("date", &date.into()).unwrap().to_json().unwrap();

        assert_eq!(
            wire,
            json!({ "type": "date", "date": { "start": "2024-03-01T09:30:00.000Z" } })
        );
    }

    #[test]
    fn parses_offset_and_bare_dates() {
        assert_eq!(
            parse_date("2024-03-01T11:30:00.000+02:00").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
        );
        assert_eq!(
            parse_date("2024-03-01").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
        assert!(matches!(
            parse_date("yesterday"),
            Err(MapperError::Serialization(_))
        ));
    }

    #[test]
    fn empty_text_deserializes_to_empty_string() {
        let title = WireProperty::Title { title: vec![] };
        let text = WireProperty::RichText { rich_text: vec![] };

        assert_eq!(deserialize("title", &title).unwrap(), FieldValue::Text(String::new()));
        assert_eq!(deserialize("rich_text", &text).unwrap(), FieldValue::Text(String::new()));
    }

    #[test]
    fn multi_run_text_keeps_only_first_run() {
        let title = WireProperty::Title {
            title: vec![RichTextRun::new("first"), RichTextRun::new("second")],
        };

        assert_eq!(deserialize("title", &title).unwrap(), FieldValue::Text("first".into()));
    }

    #[test]
    fn empty_date_deserializes_to_null() {
        let wire = WireProperty::from_json(&json!({ "type": "date", "date": null })).unwrap();
        assert_eq!(deserialize("date", &wire).unwrap(), FieldValue::Null);
    }

    #[test]
    fn unsupported_type_yields_no_converter() {
        let err = converter_for("formula").err().unwrap();

        assert!(matches!(&err, MapperError::UnsupportedType(t) if t == "formula"));
        assert_eq!(err.to_string(), "Unsupported property type [formula]");
    }

    #[test]
    fn converters_report_their_type() {
        for property_type in PropertyType::ALL {
            let converter = converter_for(property_type.as_str()).unwrap();
            assert_eq!(converter.property_type(), property_type);
        }
    }

    #[test]
    fn rejects_values_of_the_wrong_kind() {
        let err = serialize("checkbox", &"yes".into()).unwrap_err();
        assert!(matches!(
            err,
            MapperError::TypeMismatch { ref expected, ref found } if expected == "checkbox" && found == "text"
        ));

        let wire = WireProperty::Checkbox { checkbox: true };
        assert!(matches!(
            deserialize("number", &wire),
            Err(MapperError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn decodes_store_responses_with_extra_members() {
        let wire = WireProperty::from_json(&json!({
            "id": "title",
            "type": "title",
            "title": [{
                "type": "text",
                "text": { "content": "Coffee", "link": null },
                "annotations": { "bold": false },
                "plain_text": "Coffee",
                "href": null
            }]
        }))
        .unwrap();

        assert_eq!(deserialize("title", &wire).unwrap(), FieldValue::Text("Coffee".into()));
    }

    #[test]
    fn decoding_unknown_tag_is_unsupported() {
        let err = WireProperty::from_json(&json!({ "type": "people", "people": [] })).unwrap_err();
        assert!(matches!(err, MapperError::UnsupportedType(t) if t == "people"));
    }

    #[test]
    fn renders_empty_property_schema() {
        assert_eq!(
            PropertyType::RichText.schema(),
            json!({ "type": "rich_text", "rich_text": {} })
        );
    }
}
