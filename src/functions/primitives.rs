//! Ready-made node functions.
//!
//! Each takes the node's input vector (`[constant, a, b, ...]`). Arguments
//! beyond what the configured arity provides read as `0.0`, so every
//! primitive is safe with any `max_arity`.

use super::catalog::FunctionCatalog;

fn arg(args: &[f64], index: usize) -> f64 {
    args.get(index).copied().unwrap_or(0.0)
}

// --- Leaves ---

pub fn constant(args: &[f64]) -> f64 {
    arg(args, 0)
}

pub fn pass_a(args: &[f64]) -> f64 {
    arg(args, 1)
}

pub fn pass_b(args: &[f64]) -> f64 {
    arg(args, 2)
}

// --- Arithmetic ---

pub fn add(args: &[f64]) -> f64 {
    arg(args, 1) + arg(args, 2)
}

pub fn sub(args: &[f64]) -> f64 {
    arg(args, 1) - arg(args, 2)
}

pub fn mul(args: &[f64]) -> f64 {
    arg(args, 1) * arg(args, 2)
}

/// Protected division: a zero divisor yields 1.0
pub fn div(args: &[f64]) -> f64 {
    let divisor = arg(args, 2);
    if divisor == 0.0 {
        1.0
    } else {
        arg(args, 1) / divisor
    }
}

pub fn min(args: &[f64]) -> f64 {
    arg(args, 1).min(arg(args, 2))
}

pub fn max(args: &[f64]) -> f64 {
    arg(args, 1).max(arg(args, 2))
}

pub fn neg(args: &[f64]) -> f64 {
    -arg(args, 1)
}

// --- Trigonometric ---

pub fn sin(args: &[f64]) -> f64 {
    arg(args, 1).sin()
}

pub fn cos(args: &[f64]) -> f64 {
    arg(args, 1).cos()
}

/// Catalog of the two pass-through functions
pub fn pass_through() -> FunctionCatalog {
    FunctionCatalog::new()
        .with("pass_a", pass_a)
        .with("pass_b", pass_b)
}

/// Catalog for symbolic regression over reals
pub fn arithmetic() -> FunctionCatalog {
    FunctionCatalog::new()
        .with("const", constant)
        .with("add", add)
        .with("sub", sub)
        .with("mul", mul)
        .with("div", div)
}

/// Arithmetic plus min/max, negation and trigonometry
pub fn extended() -> FunctionCatalog {
    let mut catalog = arithmetic();
    catalog.push("min", min);
    catalog.push("max", max);
    catalog.push("neg", neg);
    catalog.push("sin", sin);
    catalog.push("cos", cos);
    catalog
}
