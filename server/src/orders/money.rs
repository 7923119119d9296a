//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic is done with `Decimal` internally, then converted
//! back to `f64` for storage and serialization.

use rust_decimal::prelude::*;

use shared::models::PaymentRecord;

use crate::utils::FieldErrors;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed order price (Rs. 10,000,000)
pub const MAX_PRICE: f64 = 10_000_000.0;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Sum of recorded payment amounts.
pub fn sum_payments(payments: &[PaymentRecord]) -> f64 {
    to_f64(payments.iter().map(|p| to_decimal(p.amount)).sum())
}

/// `max(0, price − advance − discount)`: the amount due at the payment step
/// before any pay-now amount is applied.
pub fn final_payable(price: f64, advance: f64, discount: f64) -> f64 {
    let due = to_decimal(price) - to_decimal(advance) - to_decimal(discount);
    to_f64(due.max(Decimal::ZERO))
}

/// `max(0, price − advance − discount − paid)`: outstanding balance after the
/// given total of recorded payments.
pub fn remaining_amount(price: f64, advance: f64, discount: f64, paid: f64) -> f64 {
    let due = to_decimal(price) - to_decimal(advance) - to_decimal(discount) - to_decimal(paid);
    to_f64(due.max(Decimal::ZERO))
}

/// Subtract within money rounding, clamped at zero.
pub fn subtract(a: f64, b: f64) -> f64 {
    to_f64((to_decimal(a) - to_decimal(b)).max(Decimal::ZERO))
}

/// Compare two monetary values for equality (within 0.01 tolerance)
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff < MONEY_TOLERANCE
}

/// True when the amount is zero within money tolerance.
pub fn is_zero(amount: f64) -> bool {
    money_eq(amount, 0.0)
}

// ========== Field-level amount checks ==========

/// Record an error unless the value is a finite, non-negative amount within
/// the global price ceiling.
pub fn check_amount(errors: &mut FieldErrors, field: &str, value: f64) {
    if !value.is_finite() {
        errors.insert(
            field.to_string(),
            format!("{field} must be a finite number"),
        );
    } else if value < 0.0 {
        errors.insert(
            field.to_string(),
            format!("{field} must not be negative"),
        );
    } else if value > MAX_PRICE {
        errors.insert(
            field.to_string(),
            format!("{field} exceeds the maximum allowed amount ({MAX_PRICE})"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let sum_f64 = 0.1_f64 + 0.2_f64;
        assert_ne!(sum_f64, 0.3);

        let sum_dec = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_final_payable() {
        assert_eq!(final_payable(1200.0, 500.0, 0.0), 700.0);
        assert_eq!(final_payable(1200.0, 500.0, 200.0), 500.0);
        // Clamped at zero when advance + discount exceed price
        assert_eq!(final_payable(1000.0, 800.0, 300.0), 0.0);
    }

    #[test]
    fn test_remaining_amount_accumulates() {
        assert_eq!(remaining_amount(1200.0, 500.0, 0.0, 300.0), 400.0);
        assert_eq!(remaining_amount(1200.0, 500.0, 0.0, 700.0), 0.0);
    }

    #[test]
    fn test_sum_payments_precision() {
        let payments: Vec<PaymentRecord> = (0..1000)
            .map(|_| PaymentRecord {
                amount: 0.01,
                method: "Cash".to_string(),
                note: None,
                time: 0,
            })
            .collect();
        assert_eq!(sum_payments(&payments), 10.0);
    }

    #[test]
    fn test_money_eq() {
        assert!(money_eq(100.0, 100.0));
        assert!(money_eq(100.004, 100.006));
        assert!(!money_eq(100.0, 100.02));
    }

    #[test]
    fn test_check_amount() {
        let mut errors = FieldErrors::new();
        check_amount(&mut errors, "price", 100.0);
        assert!(errors.is_empty());

        check_amount(&mut errors, "discount", -1.0);
        assert!(errors.contains_key("discount"));

        check_amount(&mut errors, "amount", f64::NAN);
        assert!(errors.contains_key("amount"));
    }
}
