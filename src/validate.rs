//! Reading Validator
//!
//! Stateless contract every inbound reading must satisfy before storage.
//! Validation *reports* malformedness instead of propagating it: the
//! result is an ordered error list, `valid` iff that list is empty, and
//! no input, however mangled, makes this module panic or mutate
//! anything.
//!
//! The checks, in the order their errors appear:
//!
//! 1. required fields present (`timestamp`, then each sensor channel);
//! 2. per channel: value is non-null, numeric, and inside the range table;
//! 3. timestamp interpretable as a point in time.
//!
//! Range checking here is the only range checking on the ingest path;
//! the store trusts validated readings and re-derives ordering only.

use serde_json::Value;

use crate::reading::{parse_timestamp, SensorKind};

/// Outcome of validating one raw reading.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    errors: Vec<String>,
}

impl ValidationReport {
    /// True iff no check failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Accumulated errors, in check order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn fail(&mut self, message: String) {
        self.errors.push(message);
    }
}

/// Validate a raw wire reading.
pub fn validate(raw: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(obj) = raw.as_object() else {
        report.fail("reading must be an object".into());
        return report;
    };

    if !obj.contains_key("timestamp") {
        report.fail("missing required field: timestamp".into());
    }
    for kind in SensorKind::ALL {
        if !obj.contains_key(kind.name()) {
            report.fail(format!("missing required field: {}", kind.name()));
        }
    }

    for kind in SensorKind::ALL {
        let Some(field) = obj.get(kind.name()) else {
            continue;
        };
        match field {
            Value::Null => report.fail(format!("{} value is null", kind.name())),
            Value::Number(n) => match n.as_f64().filter(|v| v.is_finite()) {
                Some(v) if kind.in_range(v) => {}
                Some(v) => {
                    let (min, max) = kind.valid_range();
                    report.fail(format!(
                        "{} value {} is outside valid range [{}, {}]",
                        kind.name(),
                        v,
                        min,
                        max
                    ));
                }
                None => report.fail(format!("{} value must be numeric", kind.name())),
            },
            _ => report.fail(format!("{} value must be numeric", kind.name())),
        }
    }

    if let Some(ts) = obj.get("timestamp") {
        match ts {
            Value::String(_) | Value::Number(_) => {
                if parse_timestamp(ts).is_none() {
                    report.fail("invalid timestamp format".into());
                }
            }
            _ => report.fail("timestamp must be a valid datetime".into()),
        }
    }

    report
}
