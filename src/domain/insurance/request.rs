//! Raw prediction input and its validated, immutable form.
//!
//! Every field is checked against its closed interval in declaration order;
//! BMI is derived only after the individual fields pass and is then checked
//! against its own range, independently of the height and weight bounds.

use crate::domain::errors::PredictionError;
use crate::domain::insurance::model_id::ModelId;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const AGE_RANGE: (i64, i64) = (18, 64);
pub const SEX_RANGE: (i64, i64) = (0, 1);
pub const HEIGHT_RANGE_M: (f64, f64) = (1.0, 2.5);
pub const WEIGHT_RANGE_KG: (f64, f64) = (30.0, 150.0);
pub const CHILDREN_RANGE: (i64, i64) = (0, 5);
pub const SMOKER_RANGE: (i64, i64) = (0, 1);
pub const REGION_RANGE: (i64, i64) = (0, 3);
pub const BMI_RANGE: (f64, f64) = (15.0, 50.0);

/// Body-mass index, weight (kg) / height (m)².
pub fn compute_bmi(weight_kg: f64, height_m: f64) -> f64 {
    weight_kg / (height_m * height_m)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn code(&self) -> u8 {
        match self {
            Sex::Male => 0,
            Sex::Female => 1,
        }
    }
}

/// US region of the insured, coded as in the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Southwest,
    Southeast,
    Northwest,
    Northeast,
}

impl Region {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Region::Southwest),
            1 => Some(Region::Southeast),
            2 => Some(Region::Northwest),
            3 => Some(Region::Northeast),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Region::Southwest => 0,
            Region::Southeast => 1,
            Region::Northwest => 2,
            Region::Northeast => 3,
        }
    }
}

/// Unvalidated request body, as received from the HTTP layer or a CSV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    pub age: i64,
    pub sex: i64,
    pub height: f64,
    pub weight: f64,
    pub children: i64,
    pub smoker: i64,
    pub region: i64,
    pub model: String,
}

fn check_int(field: &'static str, value: i64, (min, max): (i64, i64)) -> Result<i64, PredictionError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(PredictionError::Validation {
            field,
            value: value as f64,
            min: min as f64,
            max: max as f64,
        })
    }
}

fn check_float(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<f64, PredictionError> {
    // NaN fails `contains`
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(PredictionError::Validation {
            field,
            value,
            min,
            max,
        })
    }
}

impl PredictionInput {
    /// Validate every field, derive BMI and check it.
    pub fn validate(&self) -> Result<PredictionRequest, PredictionError> {
        let age = check_int("age", self.age, AGE_RANGE)? as u8;
        let sex = match check_int("sex", self.sex, SEX_RANGE)? {
            0 => Sex::Male,
            _ => Sex::Female,
        };
        let height_m = check_float("height", self.height, HEIGHT_RANGE_M)?;
        let weight_kg = check_float("weight", self.weight, WEIGHT_RANGE_KG)?;
        let children = check_int("children", self.children, CHILDREN_RANGE)? as u8;
        let smoker = check_int("smoker", self.smoker, SMOKER_RANGE)? == 1;
        let region_code = check_int("region", self.region, REGION_RANGE)? as u8;
        let region = Region::from_code(region_code).ok_or(PredictionError::Validation {
            field: "region",
            value: self.region as f64,
            min: REGION_RANGE.0 as f64,
            max: REGION_RANGE.1 as f64,
        })?;
        let model_id: ModelId = self.model.parse()?;

        let bmi = compute_bmi(weight_kg, height_m);
        debug!("Computed BMI: {:.2}", bmi);
        let (bmi_min, bmi_max) = BMI_RANGE;
        if !(bmi_min..=bmi_max).contains(&bmi) {
            return Err(PredictionError::DerivedConstraint {
                bmi,
                min: bmi_min,
                max: bmi_max,
            });
        }

        Ok(PredictionRequest {
            age,
            sex,
            height_m,
            weight_kg,
            children,
            smoker,
            region,
            model_id,
            bmi,
        })
    }
}

/// A request that passed validation. Only obtainable through
/// [`PredictionInput::validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    age: u8,
    sex: Sex,
    height_m: f64,
    weight_kg: f64,
    children: u8,
    smoker: bool,
    region: Region,
    model_id: ModelId,
    bmi: f64,
}

impl PredictionRequest {
    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn height_m(&self) -> f64 {
        self.height_m
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn children(&self) -> u8 {
        self.children
    }

    pub fn smoker(&self) -> bool {
        self.smoker
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn model_id(&self) -> ModelId {
        self.model_id
    }

    pub fn bmi(&self) -> f64 {
        self.bmi
    }
}
