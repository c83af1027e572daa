//! Rate table and billing computation
//!
//! Pure and deterministic: the same inputs always produce the same cost and
//! nothing here touches storage, so it is unit-testable against a fixture.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::session::VehicleType;
use crate::domain::{DomainError, DomainResult};

/// Billing rate table.
///
/// All monetary amounts are in cents (smallest currency unit).
#[derive(Debug, Clone)]
pub struct RateTable {
    /// Billing unit length in minutes; partial units always round up
    pub unit_minutes: u32,
    /// Price per unit for cars, in cents
    pub car_rate_cents: i64,
    /// Price per unit for motorcycles, in cents
    pub motorcycle_rate_cents: i64,
    /// Electric vehicle discount as a fraction in [0, 1)
    pub electric_discount: Decimal,
    /// Floor applied after discounting, in cents
    pub minimum_charge_cents: i64,
    /// Currency code (ISO 4217)
    pub currency: String,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            unit_minutes: 60,
            car_rate_cents: 12000,
            motorcycle_rate_cents: 6200,
            electric_discount: Decimal::new(25, 2),
            minimum_charge_cents: 0,
            currency: "COP".to_string(),
        }
    }
}

impl RateTable {
    /// Per-unit rate in cents for a vehicle type.
    pub fn rate_for(&self, vehicle_type: VehicleType) -> i64 {
        match vehicle_type {
            VehicleType::Motorcycle => self.motorcycle_rate_cents,
            VehicleType::Car => self.car_rate_cents,
        }
    }

    /// Compute the cost of a stay, in cents.
    ///
    /// Billed units are `ceil(elapsed / unit)`: one second into a new unit
    /// bills the full unit. A zero or negative elapsed duration is a caller
    /// error and fails with `InvalidTiming`. The electric discount is
    /// applied to the raw amount and rounded to whole cents, half away from
    /// zero; the minimum charge is a floor on the result.
    pub fn cost_cents(
        &self,
        entry_time: DateTime<Utc>,
        exit_time: DateTime<Utc>,
        vehicle_type: VehicleType,
        is_electric: bool,
    ) -> DomainResult<i64> {
        if exit_time <= entry_time {
            return Err(DomainError::InvalidTiming(format!(
                "exit time {} is not after entry time {}",
                exit_time, entry_time
            )));
        }
        let unit_ms = i64::from(self.unit_minutes) * 60_000;
        if unit_ms <= 0 {
            return Err(DomainError::Validation(
                "billing unit duration must be positive".to_string(),
            ));
        }

        // Any positive stay bills at least one unit; `max(1)` covers
        // durations under a millisecond that truncate to zero.
        let elapsed_ms = (exit_time - entry_time).num_milliseconds();
        let units = ((elapsed_ms + unit_ms - 1) / unit_ms).max(1);
        let raw_cents = units * self.rate_for(vehicle_type);

        let cents = if is_electric {
            let discounted = Decimal::from(raw_cents) * (Decimal::ONE - self.electric_discount);
            discounted
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
                .ok_or_else(|| {
                    DomainError::Validation("discounted cost out of range".to_string())
                })?
        } else {
            raw_cents
        };

        Ok(cents.max(self.minimum_charge_cents))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    /// Fixture: 2.00/unit for cars, 60-minute unit, 20% EV discount,
    /// 1.00 minimum.
    fn fixture() -> RateTable {
        RateTable {
            unit_minutes: 60,
            car_rate_cents: 200,
            motorcycle_rate_cents: 100,
            electric_discount: Decimal::new(20, 2),
            minimum_charge_cents: 100,
            currency: "USD".to_string(),
        }
    }

    fn entry() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn ninety_minutes_bills_two_units() {
        let rates = fixture();
        let cost = rates
            .cost_cents(entry(), entry() + Duration::minutes(90), VehicleType::Car, false)
            .unwrap();
        assert_eq!(cost, 400);
    }

    #[test]
    fn electric_discount_applied() {
        let rates = fixture();
        let cost = rates
            .cost_cents(entry(), entry() + Duration::minutes(90), VehicleType::Car, true)
            .unwrap();
        assert_eq!(cost, 320);
    }

    #[test]
    fn one_second_into_new_unit_bills_full_unit() {
        let rates = fixture();
        let cost = rates
            .cost_cents(
                entry(),
                entry() + Duration::minutes(60) + Duration::seconds(1),
                VehicleType::Car,
                false,
            )
            .unwrap();
        assert_eq!(cost, 400);
    }

    #[test]
    fn exact_unit_boundary_bills_one_unit() {
        let rates = fixture();
        let cost = rates
            .cost_cents(entry(), entry() + Duration::minutes(60), VehicleType::Car, false)
            .unwrap();
        assert_eq!(cost, 200);
    }

    #[test]
    fn motorcycle_uses_its_own_rate() {
        let rates = fixture();
        let cost = rates
            .cost_cents(
                entry(),
                entry() + Duration::minutes(30),
                VehicleType::Motorcycle,
                false,
            )
            .unwrap();
        assert_eq!(cost, 100);
    }

    #[test]
    fn minimum_charge_is_a_floor() {
        let mut rates = fixture();
        rates.motorcycle_rate_cents = 50;
        let cost = rates
            .cost_cents(
                entry(),
                entry() + Duration::minutes(10),
                VehicleType::Motorcycle,
                true,
            )
            .unwrap();
        // 1 unit * 50 = 50, discounted to 40, floored to the 100 minimum
        assert_eq!(cost, 100);
    }

    #[test]
    fn discount_rounds_half_away_from_zero() {
        let mut rates = fixture();
        rates.car_rate_cents = 15;
        rates.electric_discount = Decimal::new(50, 2);
        rates.minimum_charge_cents = 0;
        let cost = rates
            .cost_cents(entry(), entry() + Duration::minutes(30), VehicleType::Car, true)
            .unwrap();
        // 15 * 0.5 = 7.5 → rounds up to 8
        assert_eq!(cost, 8);
    }

    #[test]
    fn sub_second_stay_bills_one_unit() {
        let rates = fixture();
        let cost = rates
            .cost_cents(
                entry(),
                entry() + Duration::milliseconds(500),
                VehicleType::Car,
                false,
            )
            .unwrap();
        assert_eq!(cost, 200);
    }

    #[test]
    fn zero_elapsed_is_invalid_timing() {
        let rates = fixture();
        let err = rates
            .cost_cents(entry(), entry(), VehicleType::Car, false)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTiming(_)));
    }

    #[test]
    fn negative_elapsed_is_invalid_timing() {
        let rates = fixture();
        let err = rates
            .cost_cents(entry(), entry() - Duration::minutes(5), VehicleType::Car, false)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTiming(_)));
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let rates = fixture();
        let exit = entry() + Duration::minutes(125);
        let a = rates.cost_cents(entry(), exit, VehicleType::Car, true).unwrap();
        let b = rates.cost_cents(entry(), exit, VehicleType::Car, true).unwrap();
        assert_eq!(a, b);
    }
}
