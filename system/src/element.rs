use euclid::default::Point2D;
use serde::{Deserialize, Serialize};

use crate::types::{Color, ElementId};

pub type Point = Point2D<f32>;

/// Geometry of one drawing primitive, tagged the way elements travel on the
/// wire (`"type": "brush"` and so on).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Brush { points: Vec<Point> },
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
    Rectangle { x1: f32, y1: f32, x2: f32, y2: f32 },
    Ellipse { x1: f32, y1: f32, x2: f32, y2: f32 },
    Arrow { x1: f32, y1: f32, x2: f32, y2: f32 },
    Text { x1: f32, y1: f32, text: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
}

/// One committed or in-progress drawing primitive. Author attribution is
/// not stored here; the engine attaches it to the progress envelope at
/// broadcast time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub id: ElementId,
    #[serde(flatten)]
    pub shape: Shape,
    #[serde(flatten)]
    pub style: Style,
}

/// Wire form of an element as received from a client. Anything without a
/// recognized `type` lands in `Inert` and is skipped by the relay, the
/// registry and every renderer - never appended, never rebroadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawElement {
    Element(Element),
    Inert(serde_json::Value),
}

impl RawElement {
    pub fn into_element(self) -> Option<Element> {
        match self {
            RawElement::Element(element) => Some(element),
            RawElement::Inert(_) => None,
        }
    }
}

impl From<Element> for RawElement {
    fn from(element: Element) -> Self {
        RawElement::Element(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn it_parses_a_brush_element_with_point_pairs() {
        let raw = serde_json::from_value::<RawElement>(json!({
            "id": 2,
            "type": "brush",
            "points": [[1.0, 2.0], [3.0, 4.0]],
            "stroke": { "r": 10, "g": 20, "b": 30 },
            "size": 4.0
        }))
        .expect("must parse");

        let element = raw.into_element().expect("brush is a recognized type");
        assert_eq!(element.id, 2);
        match &element.shape {
            Shape::Brush { points } => {
                assert_eq!(points, &vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
            }
            other => panic!("unexpected shape: {:?}", other),
        }
        assert_eq!(element.style.size, Some(4.0));
        assert_eq!(element.style.fill, None);
    }

    #[test]
    fn points_serialize_back_as_pairs() {
        let element = Element {
            id: 0,
            shape: Shape::Brush {
                points: vec![Point::new(1.0, 2.0)],
            },
            style: Style::default(),
        };

        let value = serde_json::to_value(&element).expect("must serialize");
        assert_eq!(value["type"], "brush");
        assert_eq!(value["points"], json!([[1.0, 2.0]]));
    }

    #[test]
    fn an_unrecognized_type_is_inert() {
        let raw = serde_json::from_value::<RawElement>(json!({
            "id": 1,
            "type": "hexagon",
            "x1": 0.0
        }))
        .expect("inert, not an error");

        assert!(raw.into_element().is_none());
    }

    #[test]
    fn a_missing_type_is_inert() {
        let raw = serde_json::from_value::<RawElement>(json!({ "id": 7 }))
            .expect("inert, not an error");

        assert!(raw.into_element().is_none());
    }

    #[test]
    fn a_shape_round_trips_through_the_wire_form() {
        let element = Element {
            id: 3,
            shape: Shape::Rectangle {
                x1: 0.0,
                y1: 0.0,
                x2: 10.0,
                y2: 10.0,
            },
            style: Style {
                stroke: Some(Color { r: 1, g: 2, b: 3 }),
                fill: None,
                size: Some(2.0),
            },
        };

        let text = serde_json::to_string(&RawElement::from(element.clone())).expect("must serialize");
        let parsed = serde_json::from_str::<RawElement>(&text)
            .expect("must parse")
            .into_element()
            .expect("rectangle is a recognized type");
        assert_eq!(parsed, element);
    }

    #[test]
    fn style_fields_are_optional() {
        let raw = serde_json::from_value::<RawElement>(json!({
            "type": "line",
            "x1": 0.0, "y1": 0.0, "x2": 5.0, "y2": 5.0
        }))
        .expect("must parse");

        let element = raw.into_element().expect("line is a recognized type");
        assert_eq!(element.id, 0);
        assert_eq!(element.style, Style::default());
    }
}
