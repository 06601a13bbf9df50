/// Monetary helpers for platform fee accounting.
///
/// All amounts are plain decimal values rounded to 2 places (half-up);
/// the database stores them as DOUBLE PRECISION.

/// Percentage deducted from every transaction before crediting the payee.
pub const PLATFORM_FEE_RATE: f64 = 0.05;

/// Round to 2 decimal places, half-up.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub fn platform_fee(amount: f64) -> f64 {
    round_to_cents(amount * PLATFORM_FEE_RATE)
}

pub fn net_amount(amount: f64) -> f64 {
    amount - platform_fee(amount)
}

/// Compare two amounts at cent precision. Used where float arithmetic
/// would make direct equality unreliable (e.g. milestone sums).
pub fn cents_equal(a: f64, b: f64) -> bool {
    (a * 100.0).round() as i64 == (b * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(10.567), 10.57);
        assert_eq!(round_to_cents(10.564), 10.56);
        assert_eq!(round_to_cents(0.1 + 0.2), 0.3);
    }

    #[test]
    fn test_platform_fee() {
        assert_eq!(platform_fee(1000.0), 50.0);
        assert_eq!(platform_fee(4200.0), 210.0);
        assert_eq!(platform_fee(99.99), 5.0);
        assert_eq!(platform_fee(0.0), 0.0);
    }

    #[test]
    fn test_net_amount() {
        assert_eq!(net_amount(1000.0), 950.0);
        assert_eq!(net_amount(4200.0), 3990.0);
    }

    #[test]
    fn fee_plus_net_equals_amount() {
        for amount in [1.0, 10.5, 99.99, 1234.56, 100000.0] {
            assert!(cents_equal(platform_fee(amount) + net_amount(amount), amount));
        }
    }

    #[test]
    fn test_cents_equal() {
        assert!(cents_equal(400.0 + 600.0, 1000.0));
        assert!(cents_equal(0.1 + 0.2, 0.3));
        assert!(!cents_equal(999.99, 1000.0));
    }
}
