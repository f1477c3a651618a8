//! Flattening structured values into `ViewData` entries with dotted,
//! lower-cased keys (`user.address.city`).

use std::fmt::{Display, Write};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::Serialize;
use serde_json::Value;

use crate::{data::{ViewData, bool_str}, error::{ViewError, ViewErrorKind}, warn};


/// Types that know how to write their fields into a `Binder`.
pub trait Bindable {
    fn bind_fields(&self, b: &mut Binder);
}

/// Leaf values: rendered to one string each.
pub trait FieldValue {
    /// `date_format` is only used by timestamps.
    fn to_field(&self, date_format: &str) -> String;
}

macro_rules! display_field_values {
    ($($t:ty)*) => {
        $(
            impl FieldValue for $t {
                fn to_field(&self, _date_format: &str) -> String {
                    self.to_string()
                }
            }
        )*
    }
}

display_field_values!(str String char i8 i16 i32 i64 i128 isize u8 u16 u32 u64 u128 usize f32 f64);

impl FieldValue for bool {
    fn to_field(&self, _date_format: &str) -> String {
        bool_str(*self).into()
    }
}

impl<T: FieldValue + ?Sized> FieldValue for &T {
    fn to_field(&self, date_format: &str) -> String {
        (**self).to_field(date_format)
    }
}

/// None is bound as the empty string.
impl<T: FieldValue> FieldValue for Option<T> {
    fn to_field(&self, date_format: &str) -> String {
        match self {
            Some(v) => v.to_field(date_format),
            None => String::new(),
        }
    }
}

// An invalid format string makes chrono's Display fail, which
// to_string would turn into a panic.
fn format_date(date: impl Display, date_format: &str) -> String {
    let mut s = String::new();
    if write!(&mut s, "{date}").is_err() {
        warn!("invalid date format {:?}", date_format);
        s.clear();
    }
    s
}

impl FieldValue for NaiveDateTime {
    fn to_field(&self, date_format: &str) -> String {
        format_date(self.format(date_format), date_format)
    }
}

impl FieldValue for NaiveDate {
    fn to_field(&self, date_format: &str) -> String {
        format_date(self.format(date_format), date_format)
    }
}

impl<Tz: TimeZone> FieldValue for DateTime<Tz> where Tz::Offset: Display {
    fn to_field(&self, date_format: &str) -> String {
        format_date(self.format(date_format), date_format)
    }
}


pub struct Binder<'d> {
    data: &'d mut ViewData,
    root: String,
    date_format: &'d str,
}

impl<'d> Binder<'d> {
    /// Keys will be `root.name`, or just `name` if `root` is empty.
    pub fn new(data: &'d mut ViewData, root: &str, date_format: &'d str) -> Self {
        Binder {
            data,
            root: root.to_lowercase(),
            date_format,
        }
    }

    pub fn key(&self, name: &str) -> String {
        if self.root.is_empty() {
            name.to_lowercase()
        } else {
            format!("{}.{}", self.root, name.to_lowercase())
        }
    }

    pub fn field<V: FieldValue + ?Sized>(&mut self, name: &str, value: &V) -> &mut Self {
        let key = self.key(name);
        self.data.set(&key, value.to_field(self.date_format));
        self
    }

    /// Like `field` with a different date format for this value.
    pub fn field_formatted<V: FieldValue + ?Sized>(
        &mut self,
        name: &str,
        value: &V,
        date_format: &str
    ) -> &mut Self {
        let key = self.key(name);
        self.data.set(&key, value.to_field(date_format));
        self
    }

    /// Bind the fields of `value` below `name`.
    pub fn nested<B: Bindable + ?Sized>(&mut self, name: &str, value: &B) -> &mut Self {
        let mut sub = Binder {
            root: self.key(name),
            data: &mut *self.data,
            date_format: self.date_format,
        };
        value.bind_fields(&mut sub);
        self
    }

    /// Bind a JSON value: objects recurse, arrays are skipped, null
    /// is the empty string.
    pub fn json(&mut self, name: &str, value: &Value) -> &mut Self {
        match value {
            Value::Null => { self.field(name, ""); }
            Value::Bool(b) => { self.field(name, b); }
            Value::Number(n) => { self.field(name, &n.to_string()); }
            Value::String(s) => { self.field(name, s.as_str()); }
            Value::Array(_) => (),
            Value::Object(map) => { self.nested(name, map); }
        }
        self
    }
}

impl Bindable for serde_json::Map<String, Value> {
    fn bind_fields(&self, b: &mut Binder) {
        for (k, v) in self {
            b.json(k, v);
        }
    }
}


/// Bind any serializable value via its JSON form. It has to
/// serialize to an object.
pub fn bind_serialize<T: Serialize + ?Sized>(
    data: &mut ViewData,
    root: &str,
    date_format: &str,
    value: &T
) -> Result<(), ViewError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => {
            map.bind_fields(&mut Binder::new(data, root, date_format));
            Ok(())
        }
        other => Err(ViewErrorKind::DataNotAnObject(other.to_string()).into())
    }
}
