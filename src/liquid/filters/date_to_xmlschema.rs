use std::fmt;

use chrono::{SecondsFormat, TimeZone, Utc};
use liquid_core::parser::{FilterArguments, ParameterReflection, ParseFilter};
use liquid_core::{FilterReflection, Result as LiquidResult, Runtime, Value, ValueView};

use crate::utils::date::parse_date;

/// Formats a date as RFC 3339 in UTC for feeds and sitemaps.
///
/// Input that is not a recognised date comes back unchanged, so the output
/// never depends on the wall clock.
#[derive(Debug, Clone)]
pub struct DateToXmlSchemaFilter;

impl fmt::Display for DateToXmlSchemaFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "date_to_xmlschema")
    }
}

impl liquid_core::Filter for DateToXmlSchemaFilter {
    fn evaluate(&self, input: &dyn ValueView, _runtime: &dyn Runtime) -> LiquidResult<Value> {
        let date_str = input.to_kstr().to_string();

        match parse_date(&date_str) {
            Some(dt) => Ok(Value::scalar(
                Utc.from_utc_datetime(&dt).to_rfc3339_opts(SecondsFormat::Secs, false),
            )),
            None => Ok(Value::scalar(date_str)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DateToXmlSchemaFilterParser;

impl FilterReflection for DateToXmlSchemaFilterParser {
    fn name(&self) -> &str {
        "date_to_xmlschema"
    }

    fn description(&self) -> &str {
        "Converts a date to XML Schema (RFC 3339) format"
    }

    fn positional_parameters(&self) -> &'static [ParameterReflection] {
        &[]
    }

    fn keyword_parameters(&self) -> &'static [ParameterReflection] {
        &[]
    }
}

impl ParseFilter for DateToXmlSchemaFilterParser {
    fn parse(&self, _arguments: FilterArguments) -> LiquidResult<Box<dyn liquid_core::Filter>> {
        Ok(Box::new(DateToXmlSchemaFilter))
    }

    fn reflection(&self) -> &dyn FilterReflection {
        self
    }
}
