/// Float text that reads back as a float (zmij may render 4e-6 and not 4.0e-6)

use std::fmt::Write;

use num_traits::float::FloatCore;
use zmij::Float;

/// Write `f` so the scalar resolver reads it back as the same float.
///
/// Magnitudes below one drop the leading zero (`.5`). Non-finite values use the
/// `.nan` / `.inf` / `-.inf` spellings, which load back as text.
pub(crate) fn write_float_string<F: Float + FloatCore, W: Write>(
    target: &mut W,
    f: F,
) -> std::fmt::Result {
    if f.is_nan() {
        return target.write_str(".nan");
    }
    if f.is_infinite() {
        return target.write_str(if f.is_sign_positive() { ".inf" } else { "-.inf" });
    }

    let mut buf = zmij::Buffer::new();
    let s = buf.format_finite(f);
    // "0.5" would load back as text, so the leading zero goes: ".5", "-.5".
    let (sign, s) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    target.write_str(sign)?;
    let s = match s.strip_prefix('0') {
        Some(rest) if rest.starts_with('.') => rest,
        Some(rest) if rest.is_empty() || rest.starts_with(['e', 'E']) => {
            return target.write_str(".0");
        }
        _ => s,
    };
    if s.contains('.') {
        return target.write_str(s);
    }
    match s.find(['e', 'E']) {
        // "4e-6" -> "4.0e-6"
        Some(exp_pos) => {
            target.write_str(&s[..exp_pos])?;
            target.write_str(".0")?;
            target.write_str(&s[exp_pos..])
        }
        None => {
            target.write_str(s)?;
            target.write_str(".0")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_scalars::resolve;
    use crate::value::Value;

    fn text(f: f64) -> String {
        let mut s = String::new();
        write_float_string(&mut s, f).unwrap();
        s
    }

    #[test]
    fn always_has_a_decimal_point() {
        assert_eq!(text(1.0), "1.0");
        assert_eq!(text(0.5), ".5");
        assert_eq!(text(-0.25), "-.25");
        assert_eq!(text(0.0), ".0");
        assert!(text(4e-6).contains(".0e"));
    }

    #[test]
    fn non_finite() {
        assert_eq!(text(f64::NAN), ".nan");
        assert_eq!(text(f64::INFINITY), ".inf");
        assert_eq!(text(f64::NEG_INFINITY), "-.inf");
    }

    #[test]
    fn reads_back_as_the_same_float() {
        for f in [1.0, -2.5, 0.1, -0.75, 0.0, 1e300, 4e-6, 123456.789] {
            assert_eq!(resolve(&text(f)), Value::Float(f), "{f}");
        }
    }
}
