//! Geometry and numeric helpers shared by the model, the player, and the
//! exporters: affine compose/decompose, SVG transform-list parsing, number
//! scanning, and output-friendly rounding.

use kurbo::Affine;
use serde::{Deserialize, Serialize};
use winnow::combinator::{alt, delimited, opt, separated};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

// ─── Rounding ────────────────────────────────────────────────────────────

/// Round `value` to `digits` decimal places.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Format a number for SVG/CSS output: at most 4 decimals, no trailing
/// zeros, never `-0`, never `NaN`/`inf`.
pub fn fmt_num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = round_to(value, 4);
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

/// `part / whole`, or 0 when `whole` is zero (or the result is not finite).
pub fn ratio(part: f64, whole: f64) -> f64 {
    let r = part / whole;
    if r.is_finite() { r } else { 0.0 }
}

// ─── Affine decomposition ────────────────────────────────────────────────

/// The components of a 2D affine transform, as the editor exposes them.
/// Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Decomposition {
    pub translate_x: f64,
    pub translate_y: f64,
    pub angle: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub skew_x: f64,
    pub skew_y: f64,
}

impl Default for Decomposition {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            skew_x: 0.0,
            skew_y: 0.0,
        }
    }
}

/// QR-decompose an affine matrix into translate / rotate / scale / skewX.
/// `skew_y` is always 0: a 2D affine has only five degrees of freedom once
/// translation is removed.
pub fn decompose(matrix: Affine) -> Decomposition {
    let [a, b, c, d, e, f] = matrix.as_coeffs();
    let denom = a * a + b * b;
    let scale_x = denom.sqrt();
    let scale_y = if scale_x == 0.0 {
        0.0
    } else {
        (a * d - c * b) / scale_x
    };
    let skew_x = if denom == 0.0 {
        0.0
    } else {
        (a * c + b * d).atan2(denom).to_degrees()
    };
    Decomposition {
        translate_x: e,
        translate_y: f,
        angle: b.atan2(a).to_degrees(),
        scale_x,
        scale_y,
        skew_x,
        skew_y: 0.0,
    }
}

/// Compose components back into a matrix: `T · R · S · SkewY · SkewX`.
pub fn compose(parts: &Decomposition) -> Affine {
    let translate = Affine::translate((parts.translate_x, parts.translate_y));
    let rotate = Affine::rotate(parts.angle.to_radians());
    let scale = Affine::scale_non_uniform(parts.scale_x, parts.scale_y);
    let skew_y = Affine::new([1.0, parts.skew_y.to_radians().tan(), 0.0, 1.0, 0.0, 0.0]);
    let skew_x = Affine::new([1.0, 0.0, parts.skew_x.to_radians().tan(), 1.0, 0.0, 0.0]);
    translate * rotate * scale * skew_y * skew_x
}

/// Format a matrix as an SVG `matrix(a b c d e f)` function.
pub fn matrix_to_svg(matrix: Affine) -> String {
    let c = matrix.as_coeffs();
    format!(
        "matrix({} {} {} {} {} {})",
        fmt_num(c[0]),
        fmt_num(c[1]),
        fmt_num(c[2]),
        fmt_num(c[3]),
        fmt_num(c[4]),
        fmt_num(c[5])
    )
}

// ─── Number scanning ─────────────────────────────────────────────────────

/// Scan one SVG number: optional sign, digits with optional fraction,
/// optional exponent. `.5`, `-3`, `1e-4` are all accepted.
pub fn parse_number(input: &mut &str) -> ModalResult<f64> {
    let start = *input;
    let _ = opt(alt(('-', '+'))).parse_next(input)?;
    let int_part: &str = take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    let mut frac_len = 0;
    if input.starts_with('.') {
        *input = &input[1..];
        let frac: &str = take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)?;
        frac_len = frac.len();
    }
    if int_part.is_empty() && frac_len == 0 {
        *input = start;
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    if input.starts_with(['e', 'E']) {
        let checkpoint = *input;
        *input = &input[1..];
        let _ = opt(alt(('-', '+'))).parse_next(input)?;
        let exp: &str = take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)?;
        if exp.is_empty() {
            *input = checkpoint;
        }
    }
    let matched = &start[..start.len() - input.len()];
    matched
        .parse::<f64>()
        .map_err(|_| ErrMode::Backtrack(ContextError::new()))
}

/// Extract every number from a free-form string (points lists, dash arrays,
/// path data). Non-numeric characters are skipped.
pub fn scan_numbers(s: &str) -> Vec<f64> {
    let mut out = Vec::new();
    let mut rest = s;
    while !rest.is_empty() {
        if let Ok(n) = parse_number.parse_next(&mut rest) {
            out.push(n);
        } else {
            let mut chars = rest.chars();
            chars.next();
            rest = chars.as_str();
        }
    }
    out
}

fn skip_separators(input: &mut &str) {
    *input = input.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
}

// ─── Transform lists ─────────────────────────────────────────────────────

/// Parse an SVG `transform` attribute into a single matrix.
///
/// Supports `matrix`, `translate`, `scale`, `rotate` (with optional center),
/// `skewX` and `skewY`. Returns `None` for malformed input.
pub fn parse_transform(s: &str) -> Option<Affine> {
    let mut rest = s.trim();
    let mut result = Affine::IDENTITY;
    while !rest.is_empty() {
        let step = parse_transform_fn.parse_next(&mut rest).ok()?;
        result = result * step;
        skip_separators(&mut rest);
    }
    Some(result)
}

fn parse_args(input: &mut &str) -> ModalResult<Vec<f64>> {
    delimited(
        ('(', take_while(0.., |c: char| c.is_whitespace())),
        separated(0.., parse_number, take_while(1.., |c: char| c.is_whitespace() || c == ',')),
        (take_while(0.., |c: char| c.is_whitespace()), ')'),
    )
    .parse_next(input)
}

fn parse_transform_fn(input: &mut &str) -> ModalResult<Affine> {
    let name: &str = take_while(1.., |c: char| c.is_ascii_alphabetic()).parse_next(input)?;
    let _ = take_while(0.., |c: char| c.is_whitespace()).parse_next(input)?;
    let args = parse_args.parse_next(input)?;
    let arg = |i: usize| args.get(i).copied();

    let affine = match (name, args.len()) {
        ("matrix", 6) => Affine::new([args[0], args[1], args[2], args[3], args[4], args[5]]),
        ("translate", 1 | 2) => Affine::translate((args[0], arg(1).unwrap_or(0.0))),
        ("scale", 1 | 2) => Affine::scale_non_uniform(args[0], arg(1).unwrap_or(args[0])),
        ("rotate", 1) => Affine::rotate(args[0].to_radians()),
        ("rotate", 3) => {
            let (cx, cy) = (args[1], args[2]);
            Affine::translate((cx, cy))
                * Affine::rotate(args[0].to_radians())
                * Affine::translate((-cx, -cy))
        }
        ("skewX", 1) => Affine::new([1.0, 0.0, args[0].to_radians().tan(), 1.0, 0.0, 0.0]),
        ("skewY", 1) => Affine::new([1.0, args[0].to_radians().tan(), 0.0, 1.0, 0.0, 0.0]),
        _ => return Err(ErrMode::Backtrack(ContextError::new())),
    };
    Ok(affine)
}
