use geo::Point;

/// Point of interest whose accessibility is evaluated
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub id: String,
    pub geometry: Point<f64>,
}

impl Destination {
    pub fn new(id: impl Into<String>, geometry: Point<f64>) -> Self {
        Self {
            id: id.into(),
            geometry,
        }
    }
}
