use kaleido::{nalgebra::SVector, *};
use thiserror::Error;

use core::{fmt, ops::Deref};

pub use serde_json;

use serde_json::{json, Value};

pub const DEFAULT_THETA: Float = 60.0;
pub const DEFAULT_RADIUS: Float = 3.0;
pub const DEFAULT_ANGLE: Float = 30.0;

pub const MIN_THETA: Float = 1.0;
pub const MAX_THETA: Float = 270.0;
pub const MIN_RADIUS: Float = 0.5;
pub const MAX_RADIUS: Float = 4.5;

/// Reported by the liveness payload, see [`health`].
pub const SERVICE_NAME: &str = "kaleido";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("request must be a JSON object")]
    NotAnObject,

    #[error("field '{0}' must be a number")]
    NotANumber(&'static str),

    #[error("field '{0}' must be a finite number")]
    NotFinite(&'static str),
}

pub trait JsonSer {
    /// Serialize `self` into a JSON value.
    fn to_json(&self) -> Value;
}

impl<T: JsonSer> JsonSer for [T] {
    fn to_json(&self) -> Value {
        Value::Array(Vec::from_iter(self.iter().map(T::to_json)))
    }
}

impl<const N: usize, T: JsonSer> JsonSer for [T; N] {
    fn to_json(&self) -> Value {
        self.as_slice().to_json()
    }
}

impl<T: JsonSer> JsonSer for Vec<T> {
    fn to_json(&self) -> Value {
        self.deref().to_json()
    }
}

impl<T: JsonSer + ?Sized> JsonSer for &T {
    fn to_json(&self) -> Value {
        (*self).to_json()
    }
}

pub trait JsonDes {
    /// Deserialize from a JSON value.
    ///
    /// Returns an error if `json`'s format or values are invalid.
    fn from_json(json: &Value) -> Result<Self, RequestError>
    where
        Self: Sized;
}

fn point_to_json(p: &SVector<Float, 2>) -> Value {
    json!({ "x": p.x, "y": p.y })
}

impl JsonSer for Image {
    /// ```json
    /// { "x": 2.598, "y": -1.5, "type": "imagem", "sequence": 1 }
    /// ```
    ///
    /// `"sequence"` is absent for the object.
    fn to_json(&self) -> Value {
        let mut json = json!({
            "x": self.x(),
            "y": self.y(),
            "type": self.kind.tag(),
        });

        if let (Some(ordinal), Value::Object(map)) = (self.kind.ordinal(), &mut json) {
            map.insert("sequence".into(), ordinal.into());
        }

        json
    }
}

/// The parameters of a kaleidoscope, as received from a client.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KaleidoscopeRequest {
    /// Angle between the mirrors, in degrees.
    pub theta: Float,
    /// Distance between the object and the mirrors' vertex.
    pub radius: Float,
    /// Angle between the object and mirror `A`, in degrees.
    pub angle: Float,
}

impl Default for KaleidoscopeRequest {
    fn default() -> Self {
        Self {
            theta: DEFAULT_THETA,
            radius: DEFAULT_RADIUS,
            angle: DEFAULT_ANGLE,
        }
    }
}

impl KaleidoscopeRequest {
    /// A request from already parsed values, rejecting non-finite ones.
    pub fn try_new(theta: Float, radius: Float, angle: Float) -> Result<Self, RequestError> {
        Ok(Self {
            theta: finite("theta", theta)?,
            radius: finite("radius", radius)?,
            angle: finite("angle", angle)?,
        })
    }

    /// Brings every parameter back in it's supported range:
    /// `theta` in `[1, 270]`, `radius` in `[0.5, 4.5]`, and `angle` modulo 360.
    #[must_use]
    pub fn clamped(self) -> Self {
        let clamped = Self {
            theta: self.theta.clamp(MIN_THETA, MAX_THETA),
            radius: self.radius.clamp(MIN_RADIUS, MAX_RADIUS),
            angle: self.angle.rem_euclid(360.0),
        };

        if clamped != self {
            log::debug!("request {self:?} clamped to {clamped:?}");
        }

        clamped
    }

    /// Clamps `self`, then runs the reflection engine on it.
    #[must_use]
    pub fn respond(self) -> KaleidoscopeResponse {
        let request = self.clamped();
        let engine = ReflectionEngine::new(request.theta);

        KaleidoscopeResponse {
            mirrors: engine.mirrors().segments(MIRROR_LENGTH),
            kaleidoscope: engine.images_of(request.radius, request.angle),
            request,
        }
    }
}

/// Accepts JSON numbers, and strings holding one, like `"4.5"`.
fn parse_number(value: &Value) -> Option<Float> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Returns `n`, or [`RequestError::NotFinite`] for the field `name` if it's infinite or NaN.
pub fn finite(name: &'static str, n: Float) -> Result<Float, RequestError> {
    if n.is_finite() {
        Ok(n)
    } else {
        Err(RequestError::NotFinite(name))
    }
}

fn number_field(json: &Value, name: &'static str, default: Float) -> Result<Float, RequestError> {
    let Some(value) = json.get(name) else {
        return Ok(default);
    };

    finite(name, parse_number(value).ok_or(RequestError::NotANumber(name))?)
}

impl JsonDes for KaleidoscopeRequest {
    /// Deserialize a request from a JSON object of the following format:
    ///
    /// ```json
    /// {
    ///     "theta": 60.0, // optional, defaults to 60
    ///     "radius": 3.0, // optional, defaults to 3
    ///     "angle": 30.0, // optional, defaults to 30
    /// }
    /// ```
    ///
    /// Values are not clamped, see [`KaleidoscopeRequest::clamped`].
    fn from_json(json: &Value) -> Result<Self, RequestError> {
        if !json.is_object() {
            return Err(RequestError::NotAnObject);
        }

        Ok(Self {
            theta: number_field(json, "theta", DEFAULT_THETA)?,
            radius: number_field(json, "radius", DEFAULT_RADIUS)?,
            angle: number_field(json, "angle", DEFAULT_ANGLE)?,
        })
    }
}

impl JsonSer for KaleidoscopeRequest {
    /// Serialize a request into a JSON object.
    ///
    /// The format of the returned object is explained in [`Self::from_json`]
    fn to_json(&self) -> Value {
        json!({
            "theta": self.theta,
            "radius": self.radius,
            "angle": self.angle,
        })
    }
}

/// A solved kaleidoscope, along with what a client needs to draw it.
#[derive(Clone, Debug, PartialEq)]
pub struct KaleidoscopeResponse {
    /// The parameters actually used, after clamping.
    pub request: KaleidoscopeRequest,
    pub kaleidoscope: Kaleidoscope,
    /// Segments for mirrors `A` and `B`, see [`MirrorPair::segments`].
    pub mirrors: [[SVector<Float, 2>; 2]; 2],
}

impl KaleidoscopeResponse {
    #[must_use]
    pub fn explanation(&self) -> String {
        let theta = self.request.theta;
        format!(
            "With mirrors at {theta}°, each reflection changes the angle by {}°",
            2.0 * theta
        )
    }
}

impl JsonSer for KaleidoscopeResponse {
    fn to_json(&self) -> Value {
        let [mirror_a, mirror_b] = self.mirrors.map(|s| s.map(|p| point_to_json(&p)));

        json!({
            "success": true,
            "images": self.kaleidoscope.images.to_json(),
            "formula": self.kaleidoscope.formula,
            "image_count": self.kaleidoscope.image_count(),
            "mirror_a": mirror_a,
            "mirror_b": mirror_b,
            "theta": self.request.theta,
            "obj_radius": self.request.radius,
            "obj_angle": self.request.angle,
            "explanation": self.explanation(),
        })
    }
}

/// The payload reported to a client whose request couldn't be handled.
pub fn failure(error: &impl fmt::Display) -> Value {
    json!({
        "success": false,
        "error": error.to_string(),
    })
}

/// The liveness payload.
pub fn health() -> Value {
    json!({
        "status": "healthy",
        "service": SERVICE_NAME,
    })
}

/// Parses, clamps and solves a JSON request.
///
/// Returns the response payload, or the [`failure`] payload if the request is invalid.
pub fn handle_request(json: &Value) -> Result<Value, Value> {
    KaleidoscopeRequest::from_json(json)
        .map(|request| request.respond().to_json())
        .map_err(|e| {
            log::warn!("rejected request: {e}");
            failure(&e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        assert_eq!(
            KaleidoscopeRequest::from_json(&json!({})),
            Ok(KaleidoscopeRequest::default())
        );

        let request = KaleidoscopeRequest::from_json(&json!({ "radius": 2 })).unwrap();
        assert_eq!(request.radius, 2.0);
        assert_eq!(request.theta, DEFAULT_THETA);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let request =
            KaleidoscopeRequest::from_json(&json!({ "theta": " 45.5", "angle": "-10" })).unwrap();
        assert_eq!(request.theta, 45.5);
        assert_eq!(request.angle, -10.0);
    }

    #[test]
    fn invalid_requests() {
        assert_eq!(
            KaleidoscopeRequest::from_json(&json!([1, 2, 3])),
            Err(RequestError::NotAnObject)
        );
        assert_eq!(
            KaleidoscopeRequest::from_json(&json!({ "theta": "sixty" })),
            Err(RequestError::NotANumber("theta"))
        );
        assert_eq!(
            KaleidoscopeRequest::from_json(&json!({ "radius": null })),
            Err(RequestError::NotANumber("radius"))
        );
        // booleans are rejected, not coerced to 0 or 1
        assert_eq!(
            KaleidoscopeRequest::from_json(&json!({ "angle": true })),
            Err(RequestError::NotANumber("angle"))
        );
        assert_eq!(
            KaleidoscopeRequest::from_json(&json!({ "angle": "inf" })),
            Err(RequestError::NotFinite("angle"))
        );
    }

    #[test]
    fn parsed_values_must_be_finite() {
        assert_eq!(
            KaleidoscopeRequest::try_new(Float::INFINITY, 3.0, 30.0),
            Err(RequestError::NotFinite("theta"))
        );
        assert_eq!(
            KaleidoscopeRequest::try_new(60.0, 3.0, Float::NAN),
            Err(RequestError::NotFinite("angle"))
        );
        assert_eq!(
            KaleidoscopeRequest::try_new(60.0, 3.0, 30.0),
            Ok(KaleidoscopeRequest::default())
        );
    }

    #[test]
    fn clamping() {
        let request = KaleidoscopeRequest {
            theta: 0.0,
            radius: 10.0,
            angle: -30.0,
        }
        .clamped();

        assert_eq!(request.theta, 1.0);
        assert_eq!(request.radius, 4.5);
        assert_eq!(request.angle, 330.0);

        let request = KaleidoscopeRequest {
            theta: 400.0,
            radius: 0.1,
            angle: 725.0,
        }
        .clamped();

        assert_eq!(request.theta, 270.0);
        assert_eq!(request.radius, 0.5);
        assert_eq!(request.angle, 5.0);

        assert_eq!(
            KaleidoscopeRequest::default().clamped(),
            KaleidoscopeRequest::default()
        );
    }

    #[test]
    fn image_json() {
        let k = generate(60.0, 3.0, 30.0);

        let object = k.images[0].to_json();
        assert_eq!(object["type"], "objeto");
        assert!(object.get("sequence").is_none());

        let first = k.images[1].to_json();
        assert_eq!(first["type"], "imagem");
        assert_eq!(first["sequence"], 1);
        assert!((first["x"].as_f64().unwrap() - 2.598).abs() < 1e-3);
        assert!((first["y"].as_f64().unwrap() + 1.5).abs() < 1e-9);
    }

    #[test]
    fn response_json() {
        let response = handle_request(&json!({ "theta": 60, "radius": 3, "angle": 30 })).unwrap();

        assert_eq!(response["success"], true);
        assert_eq!(response["formula"], "N = 360°/60° - 1 = 5");
        assert_eq!(response["image_count"], 5);
        assert_eq!(response["images"].as_array().unwrap().len(), 6);
        assert_eq!(response["theta"], 60.0);
        assert_eq!(response["obj_radius"], 3.0);
        assert_eq!(response["obj_angle"], 30.0);
        assert_eq!(
            response["explanation"],
            "With mirrors at 60°, each reflection changes the angle by 120°"
        );

        assert_eq!(response["mirror_a"], json!([{ "x": 0.0, "y": 0.0 }, { "x": 5.0, "y": 0.0 }]));

        let tip = &response["mirror_b"][1];
        assert!((tip["x"].as_f64().unwrap() - 2.5).abs() < 1e-9);
        assert!((tip["y"].as_f64().unwrap() - 4.330_127_018_922_193).abs() < 1e-9);
    }

    #[test]
    fn response_reports_clamped_parameters() {
        let response = handle_request(&json!({ "theta": 0, "angle": 390 })).unwrap();
        assert_eq!(response["theta"], 1.0);
        assert_eq!(response["obj_angle"], 30.0);
        assert_eq!(response["formula"], "N = 360°/1° - 1 = 359");
    }

    #[test]
    fn failure_json() {
        let error = handle_request(&json!({ "theta": "abc" })).unwrap_err();
        assert_eq!(
            error,
            json!({ "success": false, "error": "field 'theta' must be a number" })
        );
    }

    #[test]
    fn health_json() {
        assert_eq!(health(), json!({ "status": "healthy", "service": "kaleido" }));
    }
}
