//! Psychological ("smart") price endings.

/// Round a price to a consumer-friendly ending, working in whole cents:
///
/// | cents      | result            | example         |
/// |------------|-------------------|-----------------|
/// | `00..=33`  | previous whole `.99` | 12.25 -> 11.99 |
/// | `34..=66`  | same whole `.95`     | 12.50 -> 12.95 |
/// | `67..=99`  | same whole `.99`     | 12.75 -> 12.99 |
///
/// Prices below 1.00 (or non-finite) are not rounded.
pub fn psychological_price(price: f64) -> Option<f64> {
    if !price.is_finite() || price < 1.0 {
        return None;
    }

    let cents = (price * 100.0).round() as i64;
    let whole = cents / 100 * 100;
    let fraction = cents % 100;

    let rounded = if fraction <= 33 {
        whole - 1
    } else if fraction <= 66 {
        whole + 95
    } else {
        whole + 99
    };

    Some(rounded as f64 / 100.0)
}

/// Round to whole cents.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_examples() {
        assert_eq!(psychological_price(12.25), Some(11.99));
        assert_eq!(psychological_price(12.50), Some(12.95));
        assert_eq!(psychological_price(12.75), Some(12.99));
    }

    #[test]
    fn band_edges() {
        assert_eq!(psychological_price(12.00), Some(11.99));
        assert_eq!(psychological_price(12.33), Some(11.99));
        assert_eq!(psychological_price(12.34), Some(12.95));
        assert_eq!(psychological_price(12.66), Some(12.95));
        assert_eq!(psychological_price(12.67), Some(12.99));
        assert_eq!(psychological_price(12.99), Some(12.99));
    }

    #[test]
    fn small_and_invalid_prices_are_left_alone() {
        assert_eq!(psychological_price(0.75), None);
        assert_eq!(psychological_price(-3.0), None);
        assert_eq!(psychological_price(f64::NAN), None);
        assert_eq!(psychological_price(1.10), Some(0.99));
    }

    #[test]
    fn round_cents_snaps_float_drift() {
        assert_eq!(round_cents(6.0 + 0.25 * 3.0), 6.75);
        assert_eq!(round_cents(0.1 + 0.2), 0.3);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: the result always ends in .95 or .99.
            #[test]
            fn ending_is_95_or_99(price in 1.0f64..500.0) {
                let rounded = psychological_price(price).unwrap();
                let cents = ((rounded * 100.0).round() as i64) % 100;
                prop_assert!(cents == 95 || cents == 99, "{} -> {}", price, rounded);
            }

            /// Property: rounding moves the price by less than one unit.
            #[test]
            fn stays_within_one_unit(price in 1.0f64..500.0) {
                let rounded = psychological_price(price).unwrap();
                prop_assert!((rounded - price).abs() < 1.0);
            }
        }
    }
}
