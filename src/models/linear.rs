use crate::domain::ports::DecodedObject;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub class_attribute: String,
    pub coefficients: Vec<(String, f64)>,
    pub intercept: f64,
}

impl LinearRegression {
    pub fn new(class_attribute: impl Into<String>, intercept: f64) -> Self {
        Self {
            class_attribute: class_attribute.into(),
            coefficients: Vec::new(),
            intercept,
        }
    }

    pub fn with_coefficient(mut self, attribute: impl Into<String>, weight: f64) -> Self {
        self.coefficients.push((attribute.into(), weight));
        self
    }
}

impl fmt::Display for LinearRegression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Linear Regression Model")?;
        writeln!(f)?;
        writeln!(f, "{} =", self.class_attribute)?;
        writeln!(f)?;
        for (attribute, weight) in &self.coefficients {
            writeln!(f, "{:>12.4} * {} +", weight, attribute)?;
        }
        write!(f, "{:>12.4}", self.intercept)
    }
}

impl DecodedObject for LinearRegression {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equation_layout() {
        let model = LinearRegression::new("price", 12.3)
            .with_coefficient("size", 0.5)
            .with_coefficient("age", -2.125);

        assert_eq!(
            model.to_string(),
            "Linear Regression Model\n\nprice =\n\n\
             \x20     0.5000 * size +\n\
             \x20    -2.1250 * age +\n\
             \x20    12.3000"
        );
        assert!(model.as_drawable().is_none());
    }
}
