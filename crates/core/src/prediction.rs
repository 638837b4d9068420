//! Deterministic sugarcane yield calculator. Total function over the
//! interactive path: unknown district/soil/irrigation keys degrade to
//! neutral defaults because farmers routinely mistype names. The
//! command path used by the inbound webhook is stricter and rejects
//! unknown keys outright.

use serde::{Deserialize, Serialize};

use crate::models::AgroError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaUnit {
    Acre,
    Hectare,
}

impl AreaUnit {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "acre" | "acres" => Some(Self::Acre),
            "hectare" | "hectares" => Some(Self::Hectare),
            _ => None,
        }
    }

    fn factor(self) -> f64 {
        match self {
            Self::Acre => 1.0,
            Self::Hectare => 2.47,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldParams {
    pub district: String,
    pub area: f64,
    pub unit: AreaUnit,
    pub soil_type: String,
    pub irrigation: String,
}

const DEFAULT_SOIL_MULTIPLIER: f64 = 70.0;
const DEFAULT_DISTRICT_FACTOR: f64 = 1.0;
const DEFAULT_IRRIGATION_FACTOR: f64 = 0.8;

fn soil_multiplier(soil_type: &str) -> Option<f64> {
    match soil_type.trim().to_lowercase().as_str() {
        "alluvial" => Some(90.0),
        "clayloam" | "clay loam" => Some(75.0),
        "sandy" => Some(65.0),
        "sandyloam" | "sandy loam" => Some(65.0),
        "loam" => Some(85.0),
        "clayey" => Some(60.0),
        _ => None,
    }
}

fn district_factor(district: &str) -> Option<f64> {
    match district.trim().to_lowercase().as_str() {
        "lucknow" => Some(1.15),
        "kanpur" => Some(1.05),
        "meerut" => Some(1.25),
        "bareilly" => Some(1.15),
        "moradabad" => Some(1.1),
        "aligarh" => Some(1.05),
        "saharanpur" => Some(1.2),
        "gorakhpur" => Some(1.1),
        "faizabad" => Some(1.05),
        "jhansi" => Some(0.95),
        _ => None,
    }
}

fn irrigation_factor(irrigation: &str) -> Option<f64> {
    match irrigation.trim().to_lowercase().as_str() {
        "full" => Some(1.0),
        "partial" => Some(0.8),
        "rain-fed" | "rainfed" => Some(0.6),
        _ => None,
    }
}

/// Predicted total yield in quintals, rounded to the nearest integer.
pub fn predict_yield(params: &YieldParams) -> Result<u64, AgroError> {
    if !params.area.is_finite() || params.area < 0.0 {
        return Err(AgroError::InvalidInput(format!(
            "area must be a finite non-negative number, got {}",
            params.area
        )));
    }

    let soil = soil_multiplier(&params.soil_type).unwrap_or(DEFAULT_SOIL_MULTIPLIER);
    let district = district_factor(&params.district).unwrap_or(DEFAULT_DISTRICT_FACTOR);
    let irrigation = irrigation_factor(&params.irrigation).unwrap_or(DEFAULT_IRRIGATION_FACTOR);

    let total = soil * district * irrigation * params.area * params.unit.factor();
    Ok(total.round() as u64)
}

/// Strict entry path for the inbound-text command parser: exactly three
/// tokens (`<district> <area[unit]> <soil>`), known district and soil
/// keys required. No irrigation input on this path; it computes with a
/// neutral 1.0 factor.
pub fn run_yield_command(tokens: &[&str]) -> Result<u64, AgroError> {
    let [district, area_token, soil_type] = tokens else {
        return Err(AgroError::InvalidInput(
            "expected: yield <district> <area> <soil>".to_string(),
        ));
    };

    let unit = if area_token.to_lowercase().contains("hectare") {
        AreaUnit::Hectare
    } else {
        AreaUnit::Acre
    };
    let digits: String = area_token
        .chars()
        .take_while(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect();
    let area: f64 = digits
        .parse()
        .map_err(|_| AgroError::InvalidInput(format!("unparseable area '{area_token}'")))?;

    let soil = soil_multiplier(soil_type)
        .ok_or_else(|| AgroError::InvalidInput(format!("unknown soil type '{soil_type}'")))?;
    let district_value = district_factor(district)
        .ok_or_else(|| AgroError::InvalidInput(format!("unknown district '{district}'")))?;

    if !area.is_finite() || area < 0.0 {
        return Err(AgroError::InvalidInput(format!(
            "area must be a finite non-negative number, got {area}"
        )));
    }

    Ok((soil * district_value * area * unit.factor()).round() as u64)
}
