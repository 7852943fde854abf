use anyhow::{bail, Result};
use std::fmt;

/// Rule mapping a metric's raw value onto the 0-100 scale.
///
/// Text syntax (used in catalog YAML):
/// - `x10`            -> `min(v * 10, 100)`
/// - `/10`            -> `min(v / 10, 100)`
/// - `decay /3`       -> `max(0, 100 - v / 3)`
/// - `shift +100 /2`  -> `(v + 100) / 2`, not clamped
/// - `clamp`          -> `min(max(v, 0), 100)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Multiply(f64),
    Divide(f64),
    Decay(f64),
    Shift(f64, f64), // (offset, divisor)
    Clamp,
}

impl Transform {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s == "clamp" {
            Ok(Transform::Clamp)
        } else if let Some(rest) = s.strip_prefix("decay") {
            Ok(Transform::Decay(parse_divisor(rest)?))
        } else if let Some(rest) = s.strip_prefix("shift") {
            let parts: Vec<&str> = rest.split_whitespace().collect();
            if parts.len() != 2 {
                bail!("Shift must look like 'shift +A /B': {}", s)
            }
            let offset = match parts[0].strip_prefix('+') {
                Some(val) => parse_finite(val)?,
                None => bail!("Shift offset must start with +: {}", s),
            };
            Ok(Transform::Shift(offset, parse_divisor(parts[1])?))
        } else if let Some(val) = s.strip_prefix('x') {
            let factor = parse_finite(val)?;
            if factor <= 0.0 {
                bail!("Multiplier must be positive: {}", s)
            }
            Ok(Transform::Multiply(factor))
        } else if s.starts_with('/') {
            Ok(Transform::Divide(parse_divisor(s)?))
        } else {
            bail!("Unknown transform: {}", s)
        }
    }

    /// Apply the rule to an already-parsed value.
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Transform::Multiply(n) => (value * n).min(100.0),
            Transform::Divide(n) => (value / n).min(100.0),
            Transform::Decay(n) => (100.0 - value / n).max(0.0),
            Transform::Shift(offset, divisor) => (value + offset) / divisor,
            Transform::Clamp => value.max(0.0).min(100.0),
        }
    }
}

fn parse_divisor(s: &str) -> Result<f64> {
    let s = s.trim();
    let Some(val) = s.strip_prefix('/') else {
        bail!("Divisor must start with /: {}", s)
    };
    let divisor = parse_finite(val)?;
    if divisor <= 0.0 {
        bail!("Divisor must be positive: {}", s)
    }
    Ok(divisor)
}

fn parse_finite(s: &str) -> Result<f64> {
    let s = s.trim();
    let value: f64 = s.parse()?;
    if !value.is_finite() {
        bail!("Not a finite number: {}", s)
    }
    Ok(value)
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Multiply(n) => write!(f, "x{}", n),
            Transform::Divide(n) => write!(f, "/{}", n),
            Transform::Decay(n) => write!(f, "decay /{}", n),
            Transform::Shift(offset, divisor) => write!(f, "shift +{} /{}", offset, divisor),
            Transform::Clamp => write!(f, "clamp"),
        }
    }
}
