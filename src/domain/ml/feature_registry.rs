use crate::domain::errors::PredictionError;
use crate::domain::insurance::model_id::ModelId;
use crate::domain::insurance::request::{PredictionRequest, Region};

/// Column order of the random forest's training data.
/// This order MUST match exactly with the order used when the model was trained.
pub const RAW_REGION_FEATURES: &[&str] = &["age", "sex", "bmi", "children", "smoker", "region"];

/// Column order of the decision tree's training data. Northeast is the
/// dropped reference category.
pub const ONE_HOT_REGION_FEATURES: &[&str] = &[
    "age",
    "sex",
    "bmi",
    "children",
    "smoker",
    "region_northwest",
    "region_southeast",
    "region_southwest",
];

/// Training-time input layouts. The two are not interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureSchema {
    /// Region passed as its integer code 0-3.
    RawRegion,
    /// Region expanded to northwest/southeast/southwest indicator columns.
    OneHotRegion,
}

impl FeatureSchema {
    pub fn feature_names(&self) -> &'static [&'static str] {
        match self {
            FeatureSchema::RawRegion => RAW_REGION_FEATURES,
            FeatureSchema::OneHotRegion => ONE_HOT_REGION_FEATURES,
        }
    }

    pub fn width(&self) -> usize {
        self.feature_names().len()
    }
}

/// Fixed-order numeric input for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    schema: FeatureSchema,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn schema(&self) -> FeatureSchema {
        self.schema
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named slot, if the schema has it.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.schema
            .feature_names()
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i])
    }

    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.schema
            .feature_names()
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }
}

/// `[northwest, southeast, southwest]`; all zero for northeast.
fn region_indicators(region: Region) -> [f64; 3] {
    match region {
        Region::Southwest => [0.0, 0.0, 1.0],
        Region::Southeast => [0.0, 1.0, 0.0],
        Region::Northwest => [1.0, 0.0, 0.0],
        Region::Northeast => [0.0, 0.0, 0.0],
    }
}

/// Encode a validated request into the vector `model_id` was trained on.
pub fn encode(request: &PredictionRequest, model_id: ModelId) -> FeatureVector {
    let schema = model_id.schema();
    let mut values = vec![
        request.age() as f64,
        request.sex().code() as f64,
        request.bmi(),
        request.children() as f64,
        if request.smoker() { 1.0 } else { 0.0 },
    ];

    match schema {
        FeatureSchema::RawRegion => values.push(request.region().code() as f64),
        FeatureSchema::OneHotRegion => values.extend(region_indicators(request.region())),
    }

    debug_assert_eq!(values.len(), schema.width());
    FeatureVector { schema, values }
}

/// String-keyed variant of [`encode`]; unknown ids never fall back to a schema.
pub fn encode_for(request: &PredictionRequest, model_id: &str) -> Result<FeatureVector, PredictionError> {
    let model_id: ModelId = model_id.parse()?;
    Ok(encode(request, model_id))
}
