use std::fmt;

/// Fixed-width quantization of a value, rendered `"lower-upper"`. The top of
/// the scale is the exception: a lower bound of 100 renders as bare `"100"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    lower: u8,
    upper: Option<u16>,
}

impl Bucket {
    /// Bucket containing `value` for the given step width. `step` must be
    /// nonzero (config validation enforces this upstream).
    pub fn of(value: u8, step: u8) -> Self {
        debug_assert!(step > 0);
        let lower = (value / step) * step;
        if lower == 100 {
            Self { lower, upper: None }
        } else {
            Self {
                lower,
                upper: Some(u16::from(lower) + u16::from(step)),
            }
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upper {
            Some(upper) => write!(f, "{}-{}", self.lower, upper),
            None => write!(f, "{}", self.lower),
        }
    }
}
