// src/flow/params.rs

use serde_json::{Map, Number, Value};

/// Shape of a step's parameters, in rendering priority order.
///
/// Arrays are not a `Map`: they fall through to `Other` and get
/// the compact-JSON rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepParams<'a> {
    Absent,
    Text(&'a str),
    Number(&'a Number),
    Bool(bool),
    Map(&'a Map<String, Value>),
    Other(&'a Value),
}

impl<'a> StepParams<'a> {
    pub fn classify(parameters: Option<&'a Value>) -> Self {
        match parameters {
            None | Some(Value::Null) => StepParams::Absent,
            Some(Value::String(s)) => StepParams::Text(s),
            Some(Value::Number(n)) => StepParams::Number(n),
            Some(Value::Bool(b)) => StepParams::Bool(*b),
            Some(Value::Object(map)) => StepParams::Map(map),
            Some(other) => StepParams::Other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn null_counts_as_absent() {
        let v = Value::Null;
        assert_eq!(StepParams::classify(Some(&v)), StepParams::Absent);
        assert_eq!(StepParams::classify(None), StepParams::Absent);
    }

    #[test]
    fn arrays_are_not_maps() {
        let v = json!([1, 2]);
        assert!(matches!(StepParams::classify(Some(&v)), StepParams::Other(_)));
    }
}
