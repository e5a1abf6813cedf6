//! Field-level validation of producer write payloads.
//!
//! Validation runs against the raw JSON body rather than a typed struct so
//! that every failing field is reported at once, each with the value the
//! caller actually sent.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::NewProducer;

/// Minimum length of a CPF/CNPJ identifier (CPF has 11 digits).
pub const CPF_CNPJ_MIN_LEN: usize = 11;
/// Maximum length of a CPF/CNPJ identifier (CNPJ has 14 digits).
pub const CPF_CNPJ_MAX_LEN: usize = 14;

/// A single field that failed validation.
///
/// Serializes as `{ "type": "field", "value": .., "msg": .., "path": .., "location": "body" }`.
/// `value` is omitted when the field was absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub msg: String,
    pub path: &'static str,
    pub location: &'static str,
}

impl FieldError {
    fn body(path: &'static str, value: Option<&Value>, msg: impl Into<String>) -> Self {
        Self {
            kind: "field",
            value: value.cloned(),
            msg: msg.into(),
            path,
            location: "body",
        }
    }
}

/// All field failures found in one payload, in declaration order.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    /// Paths of the failing fields, in the order they were checked.
    #[must_use]
    pub fn paths(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.path).collect()
    }
}

/// Accumulates failures while extracting typed fields from a JSON object.
struct FieldReader<'a> {
    body: Option<&'a Map<String, Value>>,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    fn new(body: &'a Value) -> Self {
        Self {
            body: body.as_object(),
            errors: Vec::new(),
        }
    }

    fn field(&self, path: &str) -> Option<&'a Value> {
        self.body.and_then(|obj| obj.get(path)).filter(|v| !v.is_null())
    }

    fn reject(&mut self, path: &'static str, value: Option<&Value>, msg: impl Into<String>) {
        self.errors.push(FieldError::body(path, value, msg));
    }

    fn string(&mut self, path: &'static str) -> Option<(&'a Value, &'a str)> {
        match self.field(path) {
            None => {
                self.reject(path, None, format!("{path} is required"));
                None
            }
            Some(value) => match value.as_str() {
                Some(s) => Some((value, s)),
                None => {
                    self.reject(path, Some(value), format!("{path} must be a string"));
                    None
                }
            },
        }
    }

    fn string_with_len(&mut self, path: &'static str, min: usize, max: usize) -> Option<String> {
        let (value, s) = self.string(path)?;
        let len = s.chars().count();
        if (min..=max).contains(&len) {
            Some(s.to_string())
        } else {
            self.reject(
                path,
                Some(value),
                format!("{path} must be between {min} and {max} characters"),
            );
            None
        }
    }

    fn non_empty_string(&mut self, path: &'static str) -> Option<String> {
        let (value, s) = self.string(path)?;
        if s.is_empty() {
            self.reject(path, Some(value), format!("{path} must not be empty"));
            None
        } else {
            Some(s.to_string())
        }
    }

    fn number(&mut self, path: &'static str) -> Option<f64> {
        match self.field(path) {
            None => {
                self.reject(path, None, format!("{path} is required"));
                None
            }
            Some(value) => {
                let parsed = match value {
                    Value::String(s) => parse_numeric(s),
                    other => other.as_f64(),
                };
                if parsed.is_none() {
                    self.reject(path, Some(value), format!("{path} must be a number"));
                }
                parsed
            }
        }
    }

    fn string_array(&mut self, path: &'static str) -> Option<Vec<String>> {
        let Some(value) = self.field(path) else {
            self.reject(path, None, format!("{path} is required"));
            return None;
        };
        let items = value.as_array().and_then(|arr| {
            arr.iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        });
        if items.is_none() {
            self.reject(path, Some(value), format!("{path} must be an array of strings"));
        }
        items
    }
}

/// Parses a numeric string such as `"100"` or `" 12.5 "`. Non-finite
/// results (`"inf"`, `"NaN"`) are rejected.
fn parse_numeric(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Checks presence and primitive shape of every producer field.
///
/// Rules:
/// - `cpfCnpj`: string of 11 to 14 characters
/// - `producerName`, `farmName`, `city`, `state`: non-empty strings
/// - `totalArea`, `cultivableArea`, `vegetationArea`: numbers, or strings
///   that parse as a finite number
/// - `crops`: array of strings
///
/// `null` counts as absent. Unknown keys are ignored. No cross-field rule
/// is applied here; see [`validate_area_invariant`].
///
/// # Errors
///
/// Returns every failing field when any check fails.
pub fn validate_producer(body: &Value) -> Result<NewProducer, ValidationErrors> {
    let mut reader = FieldReader::new(body);

    let cpf_cnpj = reader.string_with_len("cpfCnpj", CPF_CNPJ_MIN_LEN, CPF_CNPJ_MAX_LEN);
    let producer_name = reader.non_empty_string("producerName");
    let farm_name = reader.non_empty_string("farmName");
    let city = reader.non_empty_string("city");
    let state = reader.non_empty_string("state");
    let total_area = reader.number("totalArea");
    let cultivable_area = reader.number("cultivableArea");
    let vegetation_area = reader.number("vegetationArea");
    let crops = reader.string_array("crops");

    match (
        cpf_cnpj,
        producer_name,
        farm_name,
        city,
        state,
        total_area,
        cultivable_area,
        vegetation_area,
        crops,
    ) {
        (
            Some(cpf_cnpj),
            Some(producer_name),
            Some(farm_name),
            Some(city),
            Some(state),
            Some(total_area),
            Some(cultivable_area),
            Some(vegetation_area),
            Some(crops),
        ) if reader.errors.is_empty() => Ok(NewProducer {
            cpf_cnpj,
            producer_name,
            farm_name,
            city,
            state,
            total_area,
            cultivable_area,
            vegetation_area,
            crops,
        }),
        _ => Err(ValidationErrors(reader.errors)),
    }
}

/// Checks that cultivable plus vegetation area fits inside the total area.
///
/// # Errors
///
/// Returns a single failure on `cultivableArea` when the sum exceeds
/// `totalArea`.
pub fn validate_area_invariant(producer: &NewProducer) -> Result<(), ValidationErrors> {
    let used = producer.cultivable_area + producer.vegetation_area;
    if used <= producer.total_area {
        return Ok(());
    }

    tracing::debug!(
        total_area = producer.total_area,
        used_area = used,
        "area invariant violated"
    );
    Err(ValidationErrors(vec![FieldError::body(
        "cultivableArea",
        Some(&Value::from(producer.cultivable_area)),
        format!(
            "cultivableArea + vegetationArea ({used}) must not exceed totalArea ({})",
            producer.total_area
        ),
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "cpfCnpj": "12345678901",
            "producerName": "Ana",
            "farmName": "Fazenda X",
            "city": "Goiânia",
            "state": "GO",
            "totalArea": 100,
            "cultivableArea": 60,
            "vegetationArea": 30,
            "crops": ["soy"]
        })
    }

    #[test]
    fn accepts_valid_payload() {
        let producer = validate_producer(&valid_body()).unwrap();
        assert_eq!(producer.cpf_cnpj, "12345678901");
        assert_eq!(producer.city, "Goiânia");
        assert!((producer.total_area - 100.0).abs() < f64::EPSILON);
        assert_eq!(producer.crops, vec!["soy".to_string()]);
    }

    #[test]
    fn accepts_area_invariant_violation() {
        let mut body = valid_body();
        body["cultivableArea"] = json!(90);
        assert!(validate_producer(&body).is_ok());
    }

    #[test]
    fn accepts_fourteen_char_cnpj_and_empty_crops() {
        let mut body = valid_body();
        body["cpfCnpj"] = json!("12345678000199");
        body["crops"] = json!([]);
        let producer = validate_producer(&body).unwrap();
        assert!(producer.crops.is_empty());
    }

    #[test]
    fn ignores_unknown_keys() {
        let mut body = valid_body();
        body["id"] = json!(99);
        body["extra"] = json!("ignored");
        assert!(validate_producer(&body).is_ok());
    }

    #[test]
    fn rejects_non_numeric_area() {
        let mut body = valid_body();
        body["totalArea"] = json!("abc");

        let err = validate_producer(&body).unwrap_err();
        assert_eq!(err.paths(), vec!["totalArea"]);
        assert_eq!(err.0[0].value, Some(json!("abc")));
        assert_eq!(err.0[0].location, "body");
    }

    #[test]
    fn accepts_numeric_strings_for_areas() {
        let mut body = valid_body();
        body["totalArea"] = json!("100");
        body["cultivableArea"] = json!(" 60.5 ");
        body["vegetationArea"] = json!("-3e1");

        let producer = validate_producer(&body).unwrap();
        assert!((producer.total_area - 100.0).abs() < f64::EPSILON);
        assert!((producer.cultivable_area - 60.5).abs() < f64::EPSILON);
        assert!((producer.vegetation_area + 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_empty_and_non_finite_area_strings() {
        let mut body = valid_body();
        body["totalArea"] = json!("");
        body["cultivableArea"] = json!("inf");
        body["vegetationArea"] = json!("NaN");

        let err = validate_producer(&body).unwrap_err();
        assert_eq!(err.paths(), vec!["totalArea", "cultivableArea", "vegetationArea"]);
    }

    #[test]
    fn rejects_non_scalar_area() {
        let mut body = valid_body();
        body["totalArea"] = json!(true);
        body["vegetationArea"] = json!([1]);
        let err = validate_producer(&body).unwrap_err();
        assert_eq!(err.paths(), vec!["totalArea", "vegetationArea"]);
    }

    #[test]
    fn rejects_missing_field_without_value() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("farmName");

        let err = validate_producer(&body).unwrap_err();
        assert_eq!(err.paths(), vec!["farmName"]);
        assert!(err.0[0].value.is_none());
        assert_eq!(err.0[0].msg, "farmName is required");
    }

    #[test]
    fn null_counts_as_missing() {
        let mut body = valid_body();
        body["state"] = Value::Null;
        let err = validate_producer(&body).unwrap_err();
        assert_eq!(err.paths(), vec!["state"]);
    }

    #[test]
    fn rejects_empty_strings() {
        let mut body = valid_body();
        body["producerName"] = json!("");
        body["city"] = json!("");
        let err = validate_producer(&body).unwrap_err();
        assert_eq!(err.paths(), vec!["producerName", "city"]);
    }

    #[test]
    fn whitespace_only_string_is_not_empty() {
        let mut body = valid_body();
        body["farmName"] = json!("   ");
        let producer = validate_producer(&body).unwrap();
        assert_eq!(producer.farm_name, "   ");
    }

    #[test]
    fn rejects_crops_with_non_string_items() {
        let mut body = valid_body();
        body["crops"] = json!(["soy", 3]);
        let err = validate_producer(&body).unwrap_err();
        assert_eq!(err.paths(), vec!["crops"]);

        body["crops"] = json!("soy");
        let err = validate_producer(&body).unwrap_err();
        assert_eq!(err.paths(), vec!["crops"]);
    }

    #[test]
    fn collects_every_failure_in_declaration_order() {
        let body = json!({
            "cpfCnpj": "123",
            "producerName": 5,
            "totalArea": "abc",
            "crops": {}
        });
        let err = validate_producer(&body).unwrap_err();
        assert_eq!(
            err.paths(),
            vec![
                "cpfCnpj",
                "producerName",
                "farmName",
                "city",
                "state",
                "totalArea",
                "cultivableArea",
                "vegetationArea",
                "crops",
            ]
        );
    }

    #[test]
    fn non_object_body_fails_every_field() {
        let err = validate_producer(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.0.len(), 9);
    }

    #[test]
    fn field_error_serializes_with_type_tag() {
        let mut body = valid_body();
        body["totalArea"] = json!("abc");
        let err = validate_producer(&body).unwrap_err();

        let json = serde_json::to_value(&err.0[0]).unwrap();
        assert_eq!(json["type"], "field");
        assert_eq!(json["path"], "totalArea");
        assert_eq!(json["location"], "body");
        assert_eq!(json["value"], "abc");
        assert_eq!(json["msg"], "totalArea must be a number");
    }

    #[test]
    fn area_invariant_accepts_exact_fit() {
        let producer = validate_producer(&json!({
            "cpfCnpj": "12345678901",
            "producerName": "Ana",
            "farmName": "Fazenda X",
            "city": "Goiânia",
            "state": "GO",
            "totalArea": 100,
            "cultivableArea": 70,
            "vegetationArea": 30,
            "crops": []
        }))
        .unwrap();
        assert!(validate_area_invariant(&producer).is_ok());
    }

    #[test]
    fn area_invariant_rejects_overflow() {
        let mut body = valid_body();
        body["cultivableArea"] = json!(90);
        let producer = validate_producer(&body).unwrap();

        let err = validate_area_invariant(&producer).unwrap_err();
        assert_eq!(err.paths(), vec!["cultivableArea"]);
    }

    proptest! {
        #[test]
        fn cpf_cnpj_length_bounds(len in 0usize..30) {
            let mut body = valid_body();
            body["cpfCnpj"] = json!("9".repeat(len));
            let accepted = validate_producer(&body).is_ok();
            prop_assert_eq!(accepted, (CPF_CNPJ_MIN_LEN..=CPF_CNPJ_MAX_LEN).contains(&len));
        }

        #[test]
        fn any_finite_areas_are_accepted(
            total in -1.0e9f64..1.0e9,
            cultivable in -1.0e9f64..1.0e9,
            vegetation in -1.0e9f64..1.0e9,
        ) {
            let mut body = valid_body();
            body["totalArea"] = json!(total);
            body["cultivableArea"] = json!(cultivable);
            body["vegetationArea"] = json!(vegetation);
            let producer = validate_producer(&body).unwrap();
            prop_assert_eq!(producer.total_area, total);
            prop_assert_eq!(producer.cultivable_area, cultivable);
        }
    }
}
