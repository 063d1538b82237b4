//! Built-in custom transforms
//!
//! Sample pair linking `area` and `volume` through a length passed in `extra`.

use convgraph_core::{ConversionError, ConversionResult, Value};
use crate::edge::CustomTransform;

fn length(transform: &str, extra: &[f64]) -> ConversionResult<f64> {
    match extra {
        [length, ..] => Ok(*length),
        [] => Err(ConversionError::extra_arity(transform, 1, 0)),
    }
}

/// `volume = area * extra[0]`
pub struct AreaToVolume;

impl CustomTransform for AreaToVolume {
    fn name(&self) -> &str {
        "area_to_volume"
    }

    fn apply(&self, value: &Value, extra: &[f64]) -> ConversionResult<Value> {
        let length = length(self.name(), extra)?;
        Ok(value.map(|area| area * length))
    }
}

/// `area = volume / extra[0]`; a zero length is a domain error
pub struct VolumeToArea;

impl CustomTransform for VolumeToArea {
    fn name(&self) -> &str {
        "volume_to_area"
    }

    fn apply(&self, value: &Value, extra: &[f64]) -> ConversionResult<Value> {
        let length = length(self.name(), extra)?;
        if length == 0.0 {
            return Err(ConversionError::domain("volume_to_area: length must be non-zero"));
        }
        Ok(value.map(|volume| volume / length))
    }
}
