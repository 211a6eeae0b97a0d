//! First- and second-order compensation of raw MS5803-14BA conversions.
//!
//! Integer steps use `i64` with arithmetic shifts, matching the datasheet's
//! 64-bit intermediate results. The pressure step divides SENS by 2^21 in
//! floating point; an integer shift there does not reproduce the datasheet
//! example.

use crate::structs::{CalibrationTable, Reading};

// Hundredths of °C.
const REFERENCE_TEMP: i64 = 2000;
const VERY_LOW_TEMP: i64 = -1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SecondOrder {
    pub t2: i64,
    pub off2: i64,
    pub sens2: i64,
}

pub(crate) fn second_order_terms(temp: i64, dt: i64) -> SecondOrder {
    if temp < REFERENCE_TEMP {
        let below = (temp - REFERENCE_TEMP).pow(2);
        let mut terms = SecondOrder {
            t2: (3 * dt * dt) >> 33,
            off2: (3 * below) >> 1,
            sens2: (5 * below) >> 3,
        };
        if temp < VERY_LOW_TEMP {
            let very_low = (temp - VERY_LOW_TEMP).pow(2);
            terms.off2 += 7 * very_low;
            terms.sens2 += 4 * very_low;
        }
        terms
    } else {
        SecondOrder {
            t2: (7 * dt * dt) >> 37,
            off2: (temp - REFERENCE_TEMP).pow(2) >> 4,
            sens2: 0,
        }
    }
}

/// Converts raw pressure `d1` and raw temperature `d2` into a `Reading`.
pub fn compensate(calibration: &CalibrationTable, d1: u32, d2: u32, second_order: bool) -> Reading {
    let dt = i64::from(d2) - (calibration.reference_temperature() << 8);
    let mut temp = REFERENCE_TEMP + ((dt * calibration.temperature_sensitivity()) >> 23);

    let mut off = (calibration.pressure_offset() << 16)
        + ((calibration.offset_temp_coeff() * dt) >> 7);
    let mut sens = (calibration.pressure_sensitivity() << 15)
        + ((calibration.sensitivity_temp_coeff() * dt) >> 8);

    if second_order {
        let terms = second_order_terms(temp, dt);
        temp -= terms.t2;
        off -= terms.off2;
        sens -= terms.sens2;
    }

    let sens_per_count = sens as f64 / f64::from(1u32 << 21);
    let pressure = (f64::from(d1) * sens_per_count - off as f64) / f64::from(1u32 << 15);

    Reading {
        temperature: temp as i32,
        pressure: pressure.round() as i32,
    }
}
