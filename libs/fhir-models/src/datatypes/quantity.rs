//! Quantity, Range and Ratio

use crate::core::model::impl_json_serde;
use crate::core::primitive::{self, Primitive};
use crate::core::{wire, Element, Model, PropertyAccess};
use crate::error::Result;
use rust_decimal::Decimal;
use serde_json::Value;

pub const QUANTITY_PROPERTIES: &[&str] = &[
    "value",
    "_value",
    "comparator",
    "_comparator",
    "unit",
    "_unit",
    "system",
    "_system",
    "code",
    "_code",
];

pub const UCUM_SYSTEM: &str = "http://unitsofmeasure.org";

/// A measured amount. Also used for `Duration` and `Age` values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Quantity {
    /// Element id and extensions
    pub base: Element,
    /// Numerical value, kept with its original precision
    pub value: Option<Primitive<Decimal>>,
    /// `<`, `<=`, `>=` or `>`
    pub comparator: Option<Primitive<String>>,
    /// Unit representation shown to people
    pub unit: Option<Primitive<String>>,
    /// System that defines the coded unit form
    pub system: Option<Primitive<String>>,
    /// Coded form of the unit
    pub code: Option<Primitive<String>>,
}

impl Quantity {
    pub fn new(value: impl Into<Decimal>, unit: impl Into<String>) -> Self {
        Self {
            value: Some(Primitive::new(value.into())),
            unit: Some(Primitive::new(unit.into())),
            ..Default::default()
        }
    }

    /// A UCUM-coded quantity, with the code doubling as the display unit.
    pub fn ucum(value: impl Into<Decimal>, code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            value: Some(Primitive::new(value.into())),
            unit: Some(Primitive::new(code.clone())),
            system: Some(Primitive::new(UCUM_SYSTEM.to_string())),
            code: Some(Primitive::new(code)),
            ..Default::default()
        }
    }

    /// Builds a quantity from a float. NaN and infinities have no JSON form,
    /// so they yield `None`.
    pub fn from_f64(value: f64, unit: impl Into<String>) -> Option<Self> {
        Decimal::try_from(value).ok().map(|value| Self::new(value, unit))
    }

    pub fn value(&self) -> Option<Decimal> {
        self.value.as_ref().and_then(|p| p.value)
    }
}

impl PropertyAccess for Quantity {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "value" => primitive::encode_value(self.value.as_ref()),
            "_value" => primitive::encode_element(self.value.as_ref()),
            "comparator" => primitive::encode_value(self.comparator.as_ref()),
            "_comparator" => primitive::encode_element(self.comparator.as_ref()),
            "unit" => primitive::encode_value(self.unit.as_ref()),
            "_unit" => primitive::encode_element(self.unit.as_ref()),
            "system" => primitive::encode_value(self.system.as_ref()),
            "_system" => primitive::encode_element(self.system.as_ref()),
            "code" => primitive::encode_value(self.code.as_ref()),
            "_code" => primitive::encode_element(self.code.as_ref()),
            _ => None,
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "value" => primitive::decode_value(&mut self.value, value),
            "_value" => primitive::decode_element(&mut self.value, value),
            "comparator" => primitive::decode_value(&mut self.comparator, value),
            "_comparator" => primitive::decode_element(&mut self.comparator, value),
            "unit" => primitive::decode_value(&mut self.unit, value),
            "_unit" => primitive::decode_element(&mut self.unit, value),
            "system" => primitive::decode_value(&mut self.system, value),
            "_system" => primitive::decode_element(&mut self.system, value),
            "code" => primitive::decode_value(&mut self.code, value),
            "_code" => primitive::decode_element(&mut self.code, value),
            _ => Ok(()),
        }
    }
}

impl Model for Quantity {
    const TYPE_NAME: &'static str = "Quantity";
    const PROPERTY_NAMES: &'static [&'static str] = QUANTITY_PROPERTIES;
    type Base = Element;

    fn base(&self) -> &Element {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Element {
        &mut self.base
    }
}

pub const RANGE_PROPERTIES: &[&str] = &["low", "high"];

/// Set of values bounded by low and high
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Range {
    /// Element id and extensions
    pub base: Element,
    /// Low limit
    pub low: Option<Quantity>,
    /// High limit
    pub high: Option<Quantity>,
}

impl Range {
    pub fn new(low: Option<Quantity>, high: Option<Quantity>) -> Self {
        Self {
            base: Element::default(),
            low,
            high,
        }
    }
}

impl PropertyAccess for Range {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "low" => wire::encode(self.low.as_ref()),
            "high" => wire::encode(self.high.as_ref()),
            _ => None,
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "low" => self.low = Some(wire::decode(value)?),
            "high" => self.high = Some(wire::decode(value)?),
            _ => {}
        }
        Ok(())
    }
}

impl Model for Range {
    const TYPE_NAME: &'static str = "Range";
    const PROPERTY_NAMES: &'static [&'static str] = RANGE_PROPERTIES;
    type Base = Element;

    fn base(&self) -> &Element {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Element {
        &mut self.base
    }
}

pub const RATIO_PROPERTIES: &[&str] = &["numerator", "denominator"];

/// A ratio of two Quantity values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ratio {
    /// Element id and extensions
    pub base: Element,
    /// Numerator value
    pub numerator: Option<Quantity>,
    /// Denominator value
    pub denominator: Option<Quantity>,
}

impl PropertyAccess for Ratio {
    fn read_property(&self, name: &str) -> Option<Value> {
        match name {
            "numerator" => wire::encode(self.numerator.as_ref()),
            "denominator" => wire::encode(self.denominator.as_ref()),
            _ => None,
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "numerator" => self.numerator = Some(wire::decode(value)?),
            "denominator" => self.denominator = Some(wire::decode(value)?),
            _ => {}
        }
        Ok(())
    }
}

impl Model for Ratio {
    const TYPE_NAME: &'static str = "Ratio";
    const PROPERTY_NAMES: &'static [&'static str] = RATIO_PROPERTIES;
    type Base = Element;

    fn base(&self) -> &Element {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Element {
        &mut self.base
    }
}

impl_json_serde!(Quantity, Range, Ratio);
