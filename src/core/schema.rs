/// Tool Input Schemas
///
/// Each tool declares its parameters as a list of `ParamDef`s. The same
/// definition is rendered as JSON Schema for `tools/list` and used to
/// validate raw call arguments before any handler runs.

use serde_json::{Map, Value, json};

/// Primitive type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Number,
}

impl ParamType {
    fn json_name(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Number => value.is_number(),
        }
    }
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A single required parameter with its constraints.
#[derive(Debug, Clone)]
pub struct ParamDef {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl ParamDef {
    fn new(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            description: description.to_string(),
            minimum: None,
            maximum: None,
            min_length: None,
            max_length: None,
        }
    }

    pub fn string(name: &str, description: &str) -> Self {
        Self::new(name, ParamType::String, description)
    }

    pub fn number(name: &str, description: &str) -> Self {
        Self::new(name, ParamType::Number, description)
    }

    /// Inclusive numeric range.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.minimum = Some(min);
        self.maximum = Some(max);
        self
    }

    /// Inclusive string length bounds, counted in characters.
    pub fn length(mut self, min: usize, max: Option<usize>) -> Self {
        self.min_length = Some(min);
        self.max_length = max;
        self
    }

    fn to_json_schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".into(), json!(self.param_type.json_name()));
        schema.insert("description".into(), json!(self.description));
        if let Some(min) = self.minimum {
            schema.insert("minimum".into(), json!(min));
        }
        if let Some(max) = self.maximum {
            schema.insert("maximum".into(), json!(max));
        }
        if let Some(min) = self.min_length {
            schema.insert("minLength".into(), json!(min));
        }
        if let Some(max) = self.max_length {
            schema.insert("maxLength".into(), json!(max));
        }
        Value::Object(schema)
    }

    fn check(&self, value: &Value) -> Result<(), String> {
        if !self.param_type.matches(value) {
            return Err(format!(
                "{}: expected {}, got {}",
                self.name,
                self.param_type.json_name(),
                value_type_name(value)
            ));
        }

        if let Some(n) = value.as_f64() {
            if let Some(min) = self.minimum
                && n < min
            {
                return Err(format!("{}: must be >= {}, got {}", self.name, min, n));
            }
            if let Some(max) = self.maximum
                && n > max
            {
                return Err(format!("{}: must be <= {}, got {}", self.name, max, n));
            }
        }

        if let Some(s) = value.as_str() {
            let len = s.chars().count();
            if let Some(min) = self.min_length
                && len < min
            {
                return Err(format!(
                    "{}: must be at least {} characters, got {}",
                    self.name, min, len
                ));
            }
            if let Some(max) = self.max_length
                && len > max
            {
                return Err(format!(
                    "{}: must be at most {} characters, got {}",
                    self.name, max, len
                ));
            }
        }

        Ok(())
    }
}

/// Ordered parameter list for one tool.
#[derive(Debug, Clone, Default)]
pub struct InputSchema {
    params: Vec<ParamDef>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, def: ParamDef) -> Self {
        self.params.push(def);
        self
    }

    /// JSON Schema object advertised in `tools/list`.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.clone(), p.to_json_schema()))
            .collect();
        let required: Vec<&str> = self.params.iter().map(|p| p.name.as_str()).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }

    /// Validate raw arguments field by field.
    ///
    /// Returns every violation found, not just the first one. Arguments that
    /// the schema does not declare are dropped.
    pub fn validate(&self, args: &Value) -> Result<ToolArgs, Vec<String>> {
        let empty = Map::new();
        let map = match args {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(vec![format!(
                    "arguments must be an object, got {}",
                    value_type_name(other)
                )]);
            }
        };

        let mut errors = Vec::new();
        let mut validated = Map::new();

        for def in &self.params {
            match map.get(&def.name) {
                None | Some(Value::Null) => {
                    errors.push(format!("{}: required parameter is missing", def.name));
                }
                Some(value) => match def.check(value) {
                    Ok(()) => {
                        validated.insert(def.name.clone(), value.clone());
                    }
                    Err(e) => errors.push(e),
                },
            }
        }

        if errors.is_empty() {
            Ok(ToolArgs(validated))
        } else {
            Err(errors)
        }
    }
}

/// Arguments that passed schema validation.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs(Map<String, Value>);

impl ToolArgs {
    pub fn str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn f64(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(Value::as_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinates() -> InputSchema {
        InputSchema::new()
            .param(ParamDef::number("latitude", "Latitude").range(-90.0, 90.0))
            .param(ParamDef::number("longitude", "Longitude").range(-180.0, 180.0))
    }

    #[test]
    fn accepts_values_inside_range() {
        let args = coordinates()
            .validate(&json!({ "latitude": 38.5, "longitude": -122.25 }))
            .unwrap();
        assert_eq!(args.f64("latitude"), Some(38.5));
        assert_eq!(args.f64("longitude"), Some(-122.25));
    }

    #[test]
    fn rejects_latitude_out_of_range() {
        let errors = coordinates()
            .validate(&json!({ "latitude": 91, "longitude": 0 }))
            .unwrap_err();
        assert_eq!(errors, vec!["latitude: must be <= 90, got 91".to_string()]);
    }

    #[test]
    fn reports_all_violations() {
        let errors = coordinates()
            .validate(&json!({ "latitude": "north" }))
            .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("expected number, got string"));
        assert!(errors[1].contains("longitude: required parameter is missing"));
    }

    #[test]
    fn string_length_is_counted_in_characters() {
        let schema = InputSchema::new().param(ParamDef::string("state", "State").length(2, Some(2)));
        assert!(schema.validate(&json!({ "state": "CA" })).is_ok());
        assert!(schema.validate(&json!({ "state": "CAL" })).is_err());
        assert!(schema.validate(&json!({ "state": "C" })).is_err());
    }

    #[test]
    fn null_arguments_count_as_empty() {
        let errors = coordinates().validate(&Value::Null).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "latitude: required parameter is missing".to_string(),
                "longitude: required parameter is missing".to_string(),
            ]
        );
        assert!(InputSchema::new().validate(&Value::Null).is_ok());
    }

    #[test]
    fn explicit_null_is_treated_as_missing() {
        let errors = coordinates()
            .validate(&json!({ "latitude": null, "longitude": 10 }))
            .unwrap_err();
        assert_eq!(errors, vec!["latitude: required parameter is missing".to_string()]);
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        let errors = coordinates().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(errors, vec!["arguments must be an object, got array".to_string()]);
    }

    #[test]
    fn renders_json_schema() {
        let schema = InputSchema::new()
            .param(ParamDef::string("state", "Two-letter state code").length(2, Some(2)));
        assert_eq!(
            schema.to_json_schema(),
            json!({
                "type": "object",
                "properties": {
                    "state": {
                        "type": "string",
                        "description": "Two-letter state code",
                        "minLength": 2,
                        "maxLength": 2
                    }
                },
                "required": ["state"]
            })
        );
    }
}
