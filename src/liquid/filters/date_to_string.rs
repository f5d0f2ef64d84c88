use std::fmt;

use liquid_core::parser::{FilterArguments, ParameterReflection, ParseFilter};
use liquid_core::{FilterReflection, Result as LiquidResult, Runtime, Value, ValueView};

use crate::utils::date::parse_date;

/// Formats a date as `%d %b %Y`, e.g. `07 Mar 2024`
#[derive(Debug, Clone)]
pub struct DateToStringFilter;

impl fmt::Display for DateToStringFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "date_to_string")
    }
}

impl liquid_core::Filter for DateToStringFilter {
    fn evaluate(&self, input: &dyn ValueView, _runtime: &dyn Runtime) -> LiquidResult<Value> {
        let date_str = input.to_kstr().to_string();

        match parse_date(&date_str) {
            Some(dt) => Ok(Value::scalar(dt.format("%d %b %Y").to_string())),
            // If can't parse, return the original string
            None => Ok(Value::scalar(date_str)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DateToStringFilterParser;

impl FilterReflection for DateToStringFilterParser {
    fn name(&self) -> &str {
        "date_to_string"
    }

    fn description(&self) -> &str {
        "Formats a date as day, abbreviated month and year (%d %b %Y)"
    }

    fn positional_parameters(&self) -> &'static [ParameterReflection] {
        &[]
    }

    fn keyword_parameters(&self) -> &'static [ParameterReflection] {
        &[]
    }
}

impl ParseFilter for DateToStringFilterParser {
    fn parse(&self, _args: FilterArguments) -> LiquidResult<Box<dyn liquid_core::Filter>> {
        Ok(Box::new(DateToStringFilter))
    }

    fn reflection(&self) -> &dyn FilterReflection {
        self
    }
}
