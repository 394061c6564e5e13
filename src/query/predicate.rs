//! Comparison predicates with three-valued evaluation
//!
//! A predicate test yields [`Ternary::True`], [`Ternary::False`] or
//! [`Ternary::Error`]. ERROR marks a comparison that is undefined for the
//! operand kinds (a NaN operand to an ordering test, or an ordering test
//! across incompatible kinds). Filters reduce ERROR to "drop the element";
//! it is never raised as a Rust error.

use crate::graph::PropertyValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Result of evaluating a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ternary {
    True,
    False,
    Error,
}

impl Ternary {
    pub fn from_bool(b: bool) -> Self {
        if b {
            Ternary::True
        } else {
            Ternary::False
        }
    }

    /// Reduction to ordinary boolean logic: only TRUE keeps an element
    pub fn is_true(self) -> bool {
        self == Ternary::True
    }

    pub fn is_error(self) -> bool {
        self == Ternary::Error
    }

    /// Conjunction; FALSE dominates, then ERROR
    pub fn and(self, other: Ternary) -> Ternary {
        match (self, other) {
            (Ternary::False, _) | (_, Ternary::False) => Ternary::False,
            (Ternary::Error, _) | (_, Ternary::Error) => Ternary::Error,
            _ => Ternary::True,
        }
    }

    /// Disjunction; TRUE dominates, then ERROR
    pub fn or(self, other: Ternary) -> Ternary {
        match (self, other) {
            (Ternary::True, _) | (_, Ternary::True) => Ternary::True,
            (Ternary::Error, _) | (_, Ternary::Error) => Ternary::Error,
            _ => Ternary::False,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Ternary {
        match self {
            Ternary::True => Ternary::False,
            Ternary::False => Ternary::True,
            Ternary::Error => Ternary::Error,
        }
    }

    /// Conjunction over a sequence, stopping at the first FALSE
    pub fn all(results: impl IntoIterator<Item = Ternary>) -> Ternary {
        let mut acc = Ternary::True;
        for result in results {
            acc = acc.and(result);
            if acc == Ternary::False {
                break;
            }
        }
        acc
    }

    /// Disjunction over a sequence, stopping at the first TRUE.
    /// An empty sequence is FALSE.
    pub fn any(results: impl IntoIterator<Item = Ternary>) -> Ternary {
        let mut acc = Ternary::False;
        for result in results {
            acc = acc.or(result);
            if acc == Ternary::True {
                break;
            }
        }
        acc
    }
}

/// A comparison or containment test against a fixed operand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum P {
    Eq(PropertyValue),
    Neq(PropertyValue),
    Gt(PropertyValue),
    Gte(PropertyValue),
    Lt(PropertyValue),
    Lte(PropertyValue),
    Within(Vec<PropertyValue>),
    Without(Vec<PropertyValue>),
}

impl P {
    #[allow(clippy::should_implement_trait)]
    pub fn eq(value: impl Into<PropertyValue>) -> Self {
        P::Eq(value.into())
    }

    pub fn neq(value: impl Into<PropertyValue>) -> Self {
        P::Neq(value.into())
    }

    pub fn gt(value: impl Into<PropertyValue>) -> Self {
        P::Gt(value.into())
    }

    pub fn gte(value: impl Into<PropertyValue>) -> Self {
        P::Gte(value.into())
    }

    pub fn lt(value: impl Into<PropertyValue>) -> Self {
        P::Lt(value.into())
    }

    pub fn lte(value: impl Into<PropertyValue>) -> Self {
        P::Lte(value.into())
    }

    pub fn within<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<PropertyValue>,
    {
        P::Within(values.into_iter().map(Into::into).collect())
    }

    pub fn without<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<PropertyValue>,
    {
        P::Without(values.into_iter().map(Into::into).collect())
    }

    /// Operands this predicate compares against
    pub fn operands(&self) -> &[PropertyValue] {
        match self {
            P::Eq(v) | P::Neq(v) | P::Gt(v) | P::Gte(v) | P::Lt(v) | P::Lte(v) => std::slice::from_ref(v),
            P::Within(vs) | P::Without(vs) => vs,
        }
    }

    /// Evaluate against a single candidate value
    pub fn test(&self, value: &PropertyValue) -> Ternary {
        match self {
            P::Eq(bound) => Ternary::from_bool(values_equal(value, bound)),
            P::Neq(bound) => Ternary::from_bool(!values_equal(value, bound)),
            P::Gt(bound) => ordering_test(value, bound, |o| o == Ordering::Greater),
            P::Gte(bound) => ordering_test(value, bound, |o| o != Ordering::Less),
            P::Lt(bound) => ordering_test(value, bound, |o| o == Ordering::Less),
            P::Lte(bound) => ordering_test(value, bound, |o| o != Ordering::Greater),
            P::Within(set) => Ternary::from_bool(set.iter().any(|v| values_equal(value, v))),
            P::Without(set) => Ternary::from_bool(!set.iter().any(|v| values_equal(value, v))),
        }
    }

    /// Evaluate against every value of a multi-valued property: TRUE if any
    /// value passes, otherwise ERROR if any value errored, otherwise FALSE.
    /// An absent property (no values) is FALSE.
    pub fn test_any(&self, values: &[PropertyValue]) -> Ternary {
        Ternary::any(values.iter().map(|v| self.test(v)))
    }
}

impl fmt::Display for P {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = |vs: &[PropertyValue]| {
            vs.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
        };
        match self {
            P::Eq(v) => write!(f, "eq({})", v),
            P::Neq(v) => write!(f, "neq({})", v),
            P::Gt(v) => write!(f, "gt({})", v),
            P::Gte(v) => write!(f, "gte({})", v),
            P::Lt(v) => write!(f, "lt({})", v),
            P::Lte(v) => write!(f, "lte({})", v),
            P::Within(vs) => write!(f, "within([{}])", list(vs.as_slice())),
            P::Without(vs) => write!(f, "without([{}])", list(vs.as_slice())),
        }
    }
}

// A bare value in has(key, value) means equality
macro_rules! p_from_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for P {
                fn from(value: $t) -> Self {
                    P::Eq(value.into())
                }
            }
        )*
    };
}

p_from_value!(i64, i32, f64, bool, &str, String, PropertyValue);

/// Equality: numeric across integer/float, FALSE across other kinds, and
/// NaN equals nothing (itself included)
pub fn values_equal(a: &PropertyValue, b: &PropertyValue) -> bool {
    match (a, b) {
        (PropertyValue::Boolean(x), PropertyValue::Boolean(y)) => x == y,
        (PropertyValue::String(x), PropertyValue::String(y)) => x == y,
        _ => compare_values(a, b) == Some(Ordering::Equal),
    }
}

/// Ordering between two values; `None` when undefined (NaN or cross-kind)
pub fn compare_values(a: &PropertyValue, b: &PropertyValue) -> Option<Ordering> {
    use PropertyValue::*;
    match (a, b) {
        (Integer(x), Integer(y)) => Some(x.cmp(y)),
        (Float(x), Float(y)) => x.partial_cmp(y),
        (Integer(x), Float(y)) => compare_integer_float(*x, *y),
        (Float(x), Integer(y)) => compare_integer_float(*y, *x).map(Ordering::reverse),
        (String(x), String(y)) => Some(x.cmp(y)),
        (Boolean(x), Boolean(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn ordering_test(value: &PropertyValue, bound: &PropertyValue, accept: impl Fn(Ordering) -> bool) -> Ternary {
    match compare_values(value, bound) {
        Some(ordering) => Ternary::from_bool(accept(ordering)),
        None => Ternary::Error,
    }
}

/// Exact comparison of an i64 against an f64 without rounding the integer
fn compare_integer_float(i: i64, f: f64) -> Option<Ordering> {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() {
        return None;
    }
    if f >= TWO_POW_63 {
        return Some(Ordering::Less);
    }
    if f < -TWO_POW_63 {
        return Some(Ordering::Greater);
    }
    let truncated = f.trunc();
    match i.cmp(&(truncated as i64)) {
        Ordering::Equal => truncated.partial_cmp(&f),
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAN: f64 = f64::NAN;

    #[test]
    fn test_nan_never_satisfies_ordering() {
        for p in [P::gt(1), P::gte(1), P::lt(1), P::lte(1), P::gt(NAN), P::lt(f64::INFINITY)] {
            assert_eq!(p.test(&NAN.into()), Ternary::Error, "{} on NaN", p);
        }
        // NaN bound against an ordinary value
        assert_eq!(P::gt(NAN).test(&3.into()), Ternary::Error);
        assert_eq!(P::lte(NAN).test(&3.5.into()), Ternary::Error);
    }

    #[test]
    fn test_nan_equality() {
        assert_eq!(P::eq(NAN).test(&NAN.into()), Ternary::False);
        assert_eq!(P::neq(NAN).test(&NAN.into()), Ternary::True);
        assert_eq!(P::within([NAN]).test(&NAN.into()), Ternary::False);
        assert_eq!(P::without([NAN]).test(&NAN.into()), Ternary::True);
    }

    #[test]
    fn test_numeric_comparisons_mix_kinds() {
        assert_eq!(P::eq(3).test(&3.0.into()), Ternary::True);
        assert_eq!(P::gt(1).test(&3.into()), Ternary::True);
        assert_eq!(P::gt(1).test(&1.5.into()), Ternary::True);
        assert_eq!(P::gt(2.5).test(&2.into()), Ternary::False);
        assert_eq!(P::gte(2.0).test(&2.into()), Ternary::True);
        assert_eq!(P::lt(-0.5).test(&(-1).into()), Ternary::True);
        assert_eq!(P::lt(-1.5).test(&(-1).into()), Ternary::False);
    }

    #[test]
    fn test_cross_kind_ordering_is_error() {
        assert_eq!(P::gt(1).test(&"marko".into()), Ternary::Error);
        assert_eq!(P::lt("m").test(&true.into()), Ternary::Error);
        // equality across kinds is simply false
        assert_eq!(P::eq(1).test(&"1".into()), Ternary::False);
        assert_eq!(P::neq(1).test(&"1".into()), Ternary::True);
    }

    #[test]
    fn test_string_and_boolean_ordering() {
        assert_eq!(P::gt("josh").test(&"marko".into()), Ternary::True);
        assert_eq!(P::lte("josh").test(&"josh".into()), Ternary::True);
        assert_eq!(P::gt(false).test(&true.into()), Ternary::True);
    }

    #[test]
    fn test_within_without() {
        let p = P::within(["marko", "josh"]);
        assert_eq!(p.test(&"josh".into()), Ternary::True);
        assert_eq!(p.test(&"peter".into()), Ternary::False);
        assert_eq!(P::without([1, 2]).test(&3.into()), Ternary::True);
        assert_eq!(P::without([1, 2]).test(&2.0.into()), Ternary::False);
        assert_eq!(P::within(Vec::<i64>::new()).test(&1.into()), Ternary::False);
    }

    #[test]
    fn test_multi_valued_any_semantics() {
        let values = vec![PropertyValue::Float(NAN), PropertyValue::Integer(3)];
        assert_eq!(P::gt(1).test_any(&values), Ternary::True);

        let only_nan = vec![PropertyValue::Float(NAN)];
        assert_eq!(P::gt(1).test_any(&only_nan), Ternary::Error);

        assert_eq!(P::gt(1).test_any(&[]), Ternary::False);
    }

    #[test]
    fn test_ternary_logic() {
        use Ternary::*;
        assert_eq!(True.and(Error), Error);
        assert_eq!(False.and(Error), False);
        assert_eq!(True.or(Error), True);
        assert_eq!(False.or(Error), Error);
        assert_eq!(Error.not(), Error);
        assert_eq!(Ternary::all([True, Error, False]), False);
        assert_eq!(Ternary::all(Vec::new()), True);
        assert!(!Error.is_true());
    }

    #[test]
    fn test_integer_float_extremes() {
        assert_eq!(compare_integer_float(i64::MAX, f64::INFINITY), Some(Ordering::Less));
        assert_eq!(compare_integer_float(i64::MIN, f64::NEG_INFINITY), Some(Ordering::Greater));
        assert_eq!(compare_integer_float(i64::MAX, 9_223_372_036_854_775_808.0), Some(Ordering::Less));
        assert_eq!(compare_integer_float(0, -0.0), Some(Ordering::Equal));
    }

    #[test]
    fn test_bare_value_means_eq() {
        assert_eq!(P::from("marko"), P::Eq(PropertyValue::String("marko".to_string())));
        assert_eq!(P::from(29), P::Eq(PropertyValue::Integer(29)));
        assert_eq!(format!("{}", P::within([1, 2])), "within([1, 2])");
    }
}
