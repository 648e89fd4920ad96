use toml::Value;

/// Validation rule attached to a single config property.
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    /// Value must have the same TOML type as the default.
    Any,
    /// Integer within inclusive bounds.
    IntRange { min: i64, max: i64 },
    /// Float within inclusive bounds.
    FloatRange { min: f64, max: f64 },
    /// One of the listed values.
    OneOf(Vec<Value>),
}

impl Validator {
    pub fn test(&self, value: &Value, default: &Value) -> bool {
        match self {
            Validator::Any => value.same_type(default),
            Validator::IntRange { min, max } => match value {
                Value::Integer(v) => *v >= *min && *v <= *max,
                _ => false,
            },
            Validator::FloatRange { min, max } => match value {
                Value::Float(v) => *v >= *min && *v <= *max,
                _ => false,
            },
            Validator::OneOf(options) => options.contains(value),
        }
    }

    /// The replacement for an invalid value. Out-of-range numbers clamp to
    /// the nearest bound; everything else falls back to the default.
    pub fn correct(&self, value: &Value, default: &Value) -> Value {
        match self {
            Validator::IntRange { min, max } => match value {
                Value::Integer(v) => Value::Integer((*v).clamp(*min, *max)),
                _ => default.clone(),
            },
            Validator::FloatRange { min, max } => match value {
                Value::Float(v) => Value::Float(v.clamp(*min, *max)),
                _ => default.clone(),
            },
            Validator::Any | Validator::OneOf(_) => default.clone(),
        }
    }
}

/// The declared shape of one leaf property: its default and how candidate
/// values are judged.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    default: Value,
    validator: Validator,
}

impl ValueSpec {
    pub fn new(default: impl Into<Value>) -> Self {
        Self {
            default: default.into(),
            validator: Validator::Any,
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        self.validator.test(value, &self.default)
    }

    pub fn correct(&self, value: &Value) -> Value {
        self.validator.correct(value, &self.default)
    }
}

/// One leaf property of a loaded config, with a memoized copy of its stored
/// value so repeated reads skip the document walk. The memo is dropped
/// whenever a commit touches the backing store.
#[derive(Debug, Clone)]
pub struct Property {
    path: Vec<String>,
    spec: ValueSpec,
    cached: Option<Value>,
}

impl Property {
    pub fn new(path: Vec<String>, spec: ValueSpec) -> Self {
        Self {
            path,
            spec,
            cached: None,
        }
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn spec(&self) -> &ValueSpec {
        &self.spec
    }

    pub fn cached(&self) -> Option<&Value> {
        self.cached.as_ref()
    }

    pub fn fill_cache(&mut self, value: Value) -> &Value {
        self.cached.insert(value)
    }

    pub fn invalidate_cache(&mut self) {
        self.cached = None;
    }
}

trait SameType {
    fn same_type(&self, other: &Value) -> bool;
}

impl SameType for Value {
    fn same_type(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_range_clamps_out_of_range_values() {
        let spec = ValueSpec::new(5i64).with_validator(Validator::IntRange { min: 0, max: 10 });
        assert!(spec.is_valid(&Value::Integer(10)));
        assert!(!spec.is_valid(&Value::Integer(11)));
        assert_eq!(spec.correct(&Value::Integer(11)), Value::Integer(10));
        assert_eq!(spec.correct(&Value::Integer(-4)), Value::Integer(0));
        // Wrong type falls back to the default.
        assert_eq!(spec.correct(&Value::Boolean(true)), Value::Integer(5));
    }

    #[test]
    fn test_any_validator_checks_type_only() {
        let spec = ValueSpec::new("north");
        assert!(spec.is_valid(&Value::String("south".to_string())));
        assert!(!spec.is_valid(&Value::Integer(1)));
    }

    #[test]
    fn test_one_of_validator() {
        let options = vec![Value::String("a".into()), Value::String("b".into())];
        let spec = ValueSpec::new("a").with_validator(Validator::OneOf(options));
        assert!(spec.is_valid(&Value::String("b".into())));
        assert!(!spec.is_valid(&Value::String("c".into())));
        assert_eq!(
            spec.correct(&Value::String("c".into())),
            Value::String("a".into())
        );
    }
}
