//! String templates with `{field}` / `{field:spec}` placeholders.
//!
//! Used for date-templated output folders and asset URLs
//! (`sst-items/{year}/{month:02d}/`) and for configured item properties.
//! The supported spec is an optional `0` flag, an optional width and an
//! optional `d` or `s` type. `{{` and `}}` are literal braces.

use std::fmt;

use chrono::{DateTime, Datelike, Utc};

use crate::error::{StacError, StacResult};

/// A value that can be substituted into a template.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateValue {
    Int(i64),
    Str(String),
}

impl fmt::Display for TemplateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateValue::Int(v) => write!(f, "{}", v),
            TemplateValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for TemplateValue {
    fn from(v: i64) -> Self {
        TemplateValue::Int(v)
    }
}

impl From<i32> for TemplateValue {
    fn from(v: i32) -> Self {
        TemplateValue::Int(v as i64)
    }
}

impl From<u32> for TemplateValue {
    fn from(v: u32) -> Self {
        TemplateValue::Int(v as i64)
    }
}

impl From<String> for TemplateValue {
    fn from(v: String) -> Self {
        TemplateValue::Str(v)
    }
}

impl From<&str> for TemplateValue {
    fn from(v: &str) -> Self {
        TemplateValue::Str(v.to_string())
    }
}

/// The set of named fields a template may reference.
pub trait TemplateFields {
    fn field(&self, name: &str) -> Option<TemplateValue>;
}

/// `{year}`, `{month}` and `{day}` of an instant.
pub struct DateFields<'a>(pub &'a DateTime<Utc>);

impl TemplateFields for DateFields<'_> {
    fn field(&self, name: &str) -> Option<TemplateValue> {
        match name {
            "year" => Some(self.0.year().into()),
            "month" => Some(self.0.month().into()),
            "day" => Some(self.0.day().into()),
            _ => None,
        }
    }
}

/// Expand the date placeholders of `template` from `dt`.
pub fn expand_date_template(template: &str, dt: &DateTime<Utc>) -> StacResult<String> {
    expand_template(template, &DateFields(dt))
}

/// Expand every placeholder of `template` using `fields`.
pub fn expand_template<F: TemplateFields + ?Sized>(template: &str, fields: &F) -> StacResult<String> {
    let bad = |message: &str| StacError::Template {
        template: template.to_string(),
        message: message.to_string(),
    };

    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(bad("single '}' encountered")),
            '{' => {
                let mut placeholder = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => return Err(bad("unterminated placeholder")),
                        Some(ch) => placeholder.push(ch),
                    }
                }

                let (name, spec) = match placeholder.split_once(':') {
                    Some((name, spec)) => (name.trim(), Some(spec)),
                    None => (placeholder.trim(), None),
                };
                if name.is_empty() {
                    return Err(bad("empty placeholder"));
                }

                let value = fields.field(name).ok_or_else(|| StacError::UnknownTemplateField {
                    template: template.to_string(),
                    field: name.to_string(),
                })?;

                match spec {
                    Some(spec) => {
                        let spec = FormatSpec::parse(spec).ok_or_else(|| bad("unsupported format spec"))?;
                        out.push_str(&spec.apply(&value).ok_or_else(|| bad("format spec does not match value type"))?);
                    }
                    None => out.push_str(&value.to_string()),
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecType {
    Any,
    Integer,
    String,
}

#[derive(Debug, Clone, Copy)]
struct FormatSpec {
    zero_pad: bool,
    width: usize,
    kind: SpecType,
}

impl FormatSpec {
    fn parse(spec: &str) -> Option<Self> {
        let (body, kind) = match spec.strip_suffix('d') {
            Some(body) => (body, SpecType::Integer),
            None => match spec.strip_suffix('s') {
                Some(body) => (body, SpecType::String),
                None => (spec, SpecType::Any),
            },
        };

        let zero_pad = body.starts_with('0');
        let width = if body.is_empty() { 0 } else { body.parse().ok()? };

        Some(Self {
            zero_pad,
            width,
            kind,
        })
    }

    fn apply(&self, value: &TemplateValue) -> Option<String> {
        let width = self.width;
        match (value, self.kind) {
            (TemplateValue::Int(v), SpecType::Integer | SpecType::Any) => Some(if self.zero_pad {
                format!("{:0width$}", v, width = width)
            } else {
                format!("{:>width$}", v, width = width)
            }),
            (TemplateValue::Str(s), SpecType::String | SpecType::Any) if !self.zero_pad => {
                Some(format!("{:<width$}", s, width = width))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    struct MapFields(HashMap<&'static str, TemplateValue>);

    impl TemplateFields for MapFields {
        fn field(&self, name: &str) -> Option<TemplateValue> {
            self.0.get(name).cloned()
        }
    }

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 3, 7, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_plain_date_template() {
        let s = expand_date_template("https://data.example/sst/{year}/{month}/{day}/", &date()).unwrap();
        assert_eq!(s, "https://data.example/sst/2022/3/7/");
    }

    #[test]
    fn test_zero_padded_date_template() {
        let s = expand_date_template("sst-items/{year}/{month:02d}/", &date()).unwrap();
        assert_eq!(s, "sst-items/2022/03/");
    }

    #[test]
    fn test_escaped_braces() {
        let s = expand_date_template("{{literal}}-{day:02}", &date()).unwrap();
        assert_eq!(s, "{literal}-07");
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let err = expand_date_template("{hour}", &date()).unwrap_err();
        assert!(matches!(err, StacError::UnknownTemplateField { ref field, .. } if field == "hour"));
    }

    #[test]
    fn test_malformed_templates() {
        assert!(expand_date_template("{year", &date()).is_err());
        assert!(expand_date_template("year}", &date()).is_err());
        assert!(expand_date_template("{}", &date()).is_err());
        assert!(expand_date_template("{year:x}", &date()).is_err());
    }

    #[test]
    fn test_string_fields() {
        let mut map = HashMap::new();
        map.insert("dset_id", TemplateValue::from("sst-cci"));
        map.insert("year", TemplateValue::from(2022));
        let fields = MapFields(map);

        assert_eq!(expand_template("{dset_id}/{year}", &fields).unwrap(), "sst-cci/2022");
        assert_eq!(expand_template("[{dset_id:9s}]", &fields).unwrap(), "[sst-cci  ]");
        assert!(expand_template("{dset_id:02d}", &fields).is_err());
    }
}
