//! Type compatibility
//!
//! # Assignment
//!
//! A value is assignment-compatible with a target when the two types are
//! identical, or when the target is floating and the value is an integer or
//! a narrower floating type. The scalar cases are a fixed table indexed by
//! the two primitive tags.
//!
//! An `undefined` operand is compatible with everything: it only arises
//! after an error has already been reported for it.
//!
//! # Operands
//!
//! `int`, `char`, `float` and `double` are numeric. Arithmetic yields the
//! widest operand type with `char` promoted to `int`; comparisons and
//! logical operators yield `int`.

use super::{Primitive, TypeSpec};

const T: bool = true;
const F: bool = false;

/// `ASSIGNABLE[target][value]`, indexed in [`Primitive::ALL`] order:
/// int, float, double, char, void, undefined.
const ASSIGNABLE: [[bool; 6]; 6] = [
    // value:  int float double char void undef
    /* int    */ [T, F, F, F, F, T],
    /* float  */ [T, T, F, F, F, T],
    /* double */ [T, T, T, F, F, T],
    /* char   */ [F, F, F, T, F, T],
    /* void   */ [F, F, F, F, T, T],
    /* undef  */ [T, T, T, T, T, T],
];

fn index(p: Primitive) -> usize {
    p as usize
}

/// Can a value of `value` type be assigned to a `target`?
pub fn are_assignment_compatible(target: &TypeSpec, value: &TypeSpec) -> bool {
    if target.is_undefined() || value.is_undefined() {
        return true;
    }
    match (target, value) {
        (TypeSpec::Primitive(t), TypeSpec::Primitive(v)) => ASSIGNABLE[index(*t)][index(*v)],
        _ => target == value,
    }
}

pub fn is_numeric(ty: &TypeSpec) -> bool {
    matches!(
        ty.primitive(),
        Some(Primitive::Int | Primitive::Char | Primitive::Float | Primitive::Double)
    )
}

pub fn is_integer(ty: &TypeSpec) -> bool {
    matches!(ty.primitive(), Some(Primitive::Int | Primitive::Char))
}

/// Usable as an `if`/loop condition or logical operand
pub fn is_condition(ty: &TypeSpec) -> bool {
    ty.is_undefined() || is_numeric(ty)
}

/// Result type of `+ - * /` on two operands, `None` if the operands are
/// not compatible.
pub fn arithmetic_result(left: &TypeSpec, right: &TypeSpec) -> Option<TypeSpec> {
    if left.is_undefined() || right.is_undefined() {
        return Some(TypeSpec::UNDEFINED);
    }
    if !is_numeric(left) || !is_numeric(right) {
        return None;
    }

    let widest = [left, right]
        .iter()
        .filter_map(|t| t.primitive())
        .map(|p| match p {
            Primitive::Double => 3,
            Primitive::Float => 2,
            _ => 1,
        })
        .max()
        .unwrap_or(1);

    Some(match widest {
        3 => TypeSpec::DOUBLE,
        2 => TypeSpec::FLOAT,
        _ => TypeSpec::INT,
    })
}

/// Result type of `%`
pub fn modulo_result(left: &TypeSpec, right: &TypeSpec) -> Option<TypeSpec> {
    if left.is_undefined() || right.is_undefined() {
        return Some(TypeSpec::UNDEFINED);
    }
    (is_integer(left) && is_integer(right)).then_some(TypeSpec::INT)
}

/// Result type of `== != < <= > >=`
pub fn comparison_result(left: &TypeSpec, right: &TypeSpec) -> Option<TypeSpec> {
    if left.is_undefined() || right.is_undefined() {
        return Some(TypeSpec::INT);
    }
    (is_numeric(left) && is_numeric(right)).then_some(TypeSpec::INT)
}

/// Result type of `&& ||`
pub fn logical_result(left: &TypeSpec, right: &TypeSpec) -> Option<TypeSpec> {
    (is_condition(left) && is_condition(right)).then_some(TypeSpec::INT)
}

/// Result type of unary `-`/`+`
pub fn negation_result(operand: &TypeSpec) -> Option<TypeSpec> {
    match operand.primitive() {
        Some(Primitive::Undefined) => Some(TypeSpec::UNDEFINED),
        Some(Primitive::Char) => Some(TypeSpec::INT),
        _ if is_numeric(operand) => Some(operand.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_types_are_compatible() {
        for p in Primitive::ALL {
            let t = TypeSpec::Primitive(p);
            assert!(are_assignment_compatible(&t, &t), "{} = {}", t, t);
        }
    }

    #[test]
    fn test_widening_into_floating_targets() {
        assert!(are_assignment_compatible(&TypeSpec::FLOAT, &TypeSpec::INT));
        assert!(are_assignment_compatible(&TypeSpec::DOUBLE, &TypeSpec::INT));
        assert!(are_assignment_compatible(&TypeSpec::DOUBLE, &TypeSpec::FLOAT));
    }

    #[test]
    fn test_narrowing_is_rejected() {
        assert!(!are_assignment_compatible(&TypeSpec::INT, &TypeSpec::DOUBLE));
        assert!(!are_assignment_compatible(&TypeSpec::FLOAT, &TypeSpec::DOUBLE));
        assert!(!are_assignment_compatible(&TypeSpec::INT, &TypeSpec::CHAR));
        assert!(!are_assignment_compatible(&TypeSpec::CHAR, &TypeSpec::INT));
        assert!(!are_assignment_compatible(&TypeSpec::INT, &TypeSpec::VOID));
    }

    #[test]
    fn test_records_compare_by_name() {
        let a = TypeSpec::Record { name: "a".into() };
        let b = TypeSpec::Record { name: "b".into() };
        assert!(are_assignment_compatible(&a, &a.clone()));
        assert!(!are_assignment_compatible(&a, &b));
        assert!(!are_assignment_compatible(&TypeSpec::INT, &a));
    }

    #[test]
    fn test_undefined_suppresses_cascades() {
        assert!(are_assignment_compatible(&TypeSpec::INT, &TypeSpec::UNDEFINED));
        assert!(are_assignment_compatible(&TypeSpec::UNDEFINED, &TypeSpec::DOUBLE));
    }

    #[test]
    fn test_arithmetic_promotion() {
        assert_eq!(
            arithmetic_result(&TypeSpec::INT, &TypeSpec::CHAR),
            Some(TypeSpec::INT)
        );
        assert_eq!(
            arithmetic_result(&TypeSpec::INT, &TypeSpec::FLOAT),
            Some(TypeSpec::FLOAT)
        );
        assert_eq!(
            arithmetic_result(&TypeSpec::FLOAT, &TypeSpec::DOUBLE),
            Some(TypeSpec::DOUBLE)
        );
        assert_eq!(arithmetic_result(&TypeSpec::INT, &TypeSpec::VOID), None);
        assert_eq!(modulo_result(&TypeSpec::INT, &TypeSpec::DOUBLE), None);
        assert_eq!(
            comparison_result(&TypeSpec::CHAR, &TypeSpec::DOUBLE),
            Some(TypeSpec::INT)
        );
        assert_eq!(negation_result(&TypeSpec::CHAR), Some(TypeSpec::INT));
    }
}
