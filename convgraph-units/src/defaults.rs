//! Default conversion table - engineering units organized by category
//!
//! Each category lists one direction only; the expander derives the rest.

use std::sync::Arc;
use convgraph_core::Unit;
use crate::custom::{AreaToVolume, VolumeToArea};
use crate::edge::EdgeSpec;
use crate::table::RawTable;

/// Offset between Kelvin and Celsius
pub const K2C: f64 = 273.15;

/// The default raw table
pub fn default_table() -> RawTable {
    let mut table = RawTable::new();
    register_unitless(&mut table);
    register_temperature(&mut table);
    register_relative_temperature(&mut table);
    register_geometry(&mut table);
    register_mass(&mut table);
    register_flow(&mut table);
    register_pressure(&mut table);
    register_heat(&mut table);
    register_custom(&mut table);
    table
}

fn register_unitless(t: &mut RawTable) {
    for symbol in convgraph_core::RESERVED_UNITLESS {
        t.insert(symbol, Unit::Unitless, EdgeSpec::ignore());
    }
}

fn register_temperature(t: &mut RawTable) {
    t.insert("C", "K", EdgeSpec::offset(1.0, K2C));
    t.insert("F", "K", EdgeSpec::offset(5.0 / 9.0, K2C - 32.0 * 5.0 / 9.0));
    t.insert("R", "K", EdgeSpec::factor(5.0 / 9.0));
}

/// Temperature differences: no offsets
fn register_relative_temperature(t: &mut RawTable) {
    t.insert("K", "K (rel)", EdgeSpec::ignore());
    t.insert("C", "K (rel)", EdgeSpec::factor(1.0));
    t.insert("F", "K (rel)", EdgeSpec::factor(5.0 / 9.0));
    t.insert("R", "K (rel)", EdgeSpec::factor(5.0 / 9.0));
}

fn register_geometry(t: &mut RawTable) {
    const INCH: f64 = 0.0254;
    const FOOT: f64 = 0.3048;

    // Length
    t.insert("in", "m", EdgeSpec::factor(INCH));
    t.insert("ft", "m", EdgeSpec::factor(FOOT));
    // Area
    t.insert("in2", "m2", EdgeSpec::factor(INCH.powi(2)));
    t.insert("ft2", "m2", EdgeSpec::factor(FOOT.powi(2)));
    // Volume
    t.insert("in3", "m3", EdgeSpec::factor(INCH.powi(3)));
    t.insert("ft3", "m3", EdgeSpec::factor(FOOT.powi(3)));
}

fn register_mass(t: &mut RawTable) {
    t.insert("lb", "kg", EdgeSpec::factor(1.0 / 2.204622621848776));
    // Density
    t.insert("lb/ft3", "kg/m3", EdgeSpec::factor(1.0 / 0.06242796057614462));
    // Specific volume
    t.insert("ft3/lb", "m3/kg", EdgeSpec::factor(1.0 / 16.0184635218));
}

fn register_flow(t: &mut RawTable) {
    // Velocity
    t.insert("fpm", "m/s", EdgeSpec::factor(1.0 / 196.8503937007874));
    // Volumetric flow rate
    t.insert("L/min", "m3/s", EdgeSpec::factor(1.0 / 60000.0));
    t.insert("gpm", "m3/s", EdgeSpec::factor(1.0 / 15850.32223705108));
    t.insert("cfm", "m3/s", EdgeSpec::factor(1.0 / 2118.880003289315));
    // Mass flow rate
    t.insert("lb/hr", "kg/s", EdgeSpec::factor(1.0 / 7936.6414386556));
}

fn register_pressure(t: &mut RawTable) {
    t.insert("kPa", "Pa", EdgeSpec::factor(1000.0));
    t.insert("psi", "Pa", EdgeSpec::factor(1.0 / 0.0001450377377302092));
    t.insert("inH2O", "Pa", EdgeSpec::factor(1.0 / 0.00401865));
    t.insert("mmH2O", "Pa", EdgeSpec::factor(1.0 / 0.10197162129779));
}

fn register_heat(t: &mut RawTable) {
    t.insert("kJ", "J", EdgeSpec::factor(1000.0));
    t.insert("kJ/kg", "J/kg", EdgeSpec::factor(1000.0));
    t.insert("Btu/lb", "J/kg", EdgeSpec::factor(1.0 / 0.0004299226137871357));
    t.insert("kW", "W", EdgeSpec::factor(1000.0));
    t.insert("Btu/hr", "W", EdgeSpec::factor(1.0 / 3.4121416351331));
    t.insert("Ton", "W", EdgeSpec::factor(1.0 / 0.0002843451));
    // Entropy
    t.insert("kJ/kg-K", "J/(kg.K)", EdgeSpec::factor(1000.0));
    t.insert("Btu/lb-F", "J/(kg.K)", EdgeSpec::factor(1.0 / 0.000238845896627));
}

fn register_custom(t: &mut RawTable) {
    t.insert("area", "volume", EdgeSpec::custom(Arc::new(AreaToVolume), Arc::new(VolumeToArea)));
}
