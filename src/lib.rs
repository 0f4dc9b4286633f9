#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod geom;
pub mod settings;

use error::BevelError;
use geom::{
    BevelDiagnostics, BevelMarkers, BevelRequest, BevelResult, Point3, bevel_face,
    solve_with_diagnostics,
};
use serde::Serialize;
use settings::BevelSettings;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

/// Length of the normal indicator drawn at the pivot.
const NORMAL_DISPLAY_LENGTH: f64 = 1.0;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("could not start rayon thread pool: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Renderable item handed to the viewer.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum GeometryItem {
    Point {
        label: &'static str,
        coordinates: [f64; 3],
    },
    Line {
        label: &'static str,
        start: [f64; 3],
        end: [f64; 3],
    },
    Polyline {
        points: Vec<[f64; 3]>,
    },
    Mesh {
        vertices: Vec<[f64; 3]>,
        faces: Vec<Vec<u32>>,
    },
}

#[derive(Debug, Clone)]
struct Evaluation {
    request: BevelRequest,
    result: BevelResult,
    diagnostics: BevelDiagnostics,
}

/// Live bevel editor state: parameters in, renderable geometry out.
#[wasm_bindgen]
pub struct BevelEngine {
    settings: BevelSettings,
    last: Option<Evaluation>,
    dirty: bool,
}

impl Default for BevelEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl BevelEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> BevelEngine {
        BevelEngine {
            settings: BevelSettings::default(),
            last: None,
            dirty: true,
        }
    }

    #[wasm_bindgen]
    pub fn set_anchor(&mut self, x: f64, y: f64, z: f64) -> Result<(), JsValue> {
        self.settings.anchor = finite_point("anchor", [x, y, z])?;
        self.dirty = true;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_side_b(&mut self, x: f64, y: f64, z: f64) -> Result<(), JsValue> {
        self.settings.side_b = finite_point("side_b", [x, y, z])?;
        self.dirty = true;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_side_c(&mut self, x: f64, y: f64, z: f64) -> Result<(), JsValue> {
        self.settings.side_c = finite_point("side_c", [x, y, z])?;
        self.dirty = true;
        Ok(())
    }

    /// Store a new offset; it is clamped against the side lengths on `evaluate`.
    #[wasm_bindgen]
    pub fn set_offset(&mut self, offset: f64) -> Result<(), JsValue> {
        if !offset.is_finite() {
            return Err(js_error("offset must be a finite number"));
        }
        self.settings.offset = offset;
        self.dirty = true;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_segments(&mut self, segments: u32) {
        self.settings.segments = segments as usize;
        self.dirty = true;
    }

    /// Display toggles only affect `get_geometry`, no re-evaluation needed.
    #[wasm_bindgen]
    pub fn set_display(&mut self, show_points: bool, show_mesh: bool, show_normal: bool) {
        self.settings.show_points = show_points;
        self.settings.show_mesh = show_mesh;
        self.settings.show_normal = show_normal;
    }

    /// Replace all settings from a JS object (missing fields take defaults).
    #[wasm_bindgen]
    pub fn load_settings(&mut self, value: JsValue) -> Result<(), JsValue> {
        let settings: BevelSettings = serde_wasm_bindgen::from_value(value).map_err(to_js_error)?;
        self.apply_settings(settings);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn get_settings(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.settings).map_err(to_js_error)
    }

    /// Re-solve the corner if any parameter changed since the last call.
    #[wasm_bindgen]
    pub fn evaluate(&mut self) -> Result<(), JsValue> {
        self.evaluate_settings().map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn is_degenerate(&self) -> bool {
        self.last
            .as_ref()
            .is_some_and(|evaluation| evaluation.result.is_degenerate())
    }

    /// Geometry of the last evaluation, serialized for the viewer.
    #[wasm_bindgen]
    pub fn get_geometry(&self) -> Result<JsValue, JsValue> {
        let items = self.geometry_items().map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&items).map_err(to_js_error)
    }
}

impl BevelEngine {
    #[must_use]
    pub fn settings(&self) -> &BevelSettings {
        &self.settings
    }

    pub fn apply_settings(&mut self, settings: BevelSettings) {
        self.settings = settings;
        self.dirty = true;
    }

    #[must_use]
    pub fn result(&self) -> Option<&BevelResult> {
        self.last.as_ref().map(|evaluation| &evaluation.result)
    }

    #[must_use]
    pub fn diagnostics(&self) -> Option<&BevelDiagnostics> {
        self.last.as_ref().map(|evaluation| &evaluation.diagnostics)
    }

    /// Clamp the stored settings, then solve. Clean state is a no-op.
    pub fn evaluate_settings(&mut self) -> Result<(), BevelError> {
        if !self.dirty && self.last.is_some() {
            return Ok(());
        }

        self.settings = self.settings.clamped();
        let request = self.settings.to_request()?;
        let (result, diagnostics) = solve_with_diagnostics(&request);

        debug_log!(
            "bevel evaluated: offset={} segments={} points={}",
            request.offset,
            request.segments,
            result.arc_points.len()
        );
        if diagnostics.degenerate {
            log::debug!("bevel engine: corner is degenerate, only markers will be shown");
        }

        self.last = Some(Evaluation {
            request,
            result,
            diagnostics,
        });
        self.dirty = false;
        Ok(())
    }

    /// Items for the last evaluation, filtered by the display toggles.
    pub fn geometry_items(&self) -> Result<Vec<GeometryItem>, BevelError> {
        let evaluation = self.last.as_ref().ok_or(BevelError::NotEvaluated)?;
        let Evaluation {
            request, result, ..
        } = evaluation;
        let markers = BevelMarkers::from_result(request, result);

        let mut items = vec![
            point_item("anchor", markers.anchor),
            point_item("side_b", markers.side_b),
            point_item("side_c", markers.side_c),
            line_item("ab", markers.anchor, markers.side_b),
            line_item("ac", markers.anchor, markers.side_c),
        ];

        if result.is_degenerate() {
            return Ok(items);
        }

        items.push(point_item("p1", markers.p1));
        items.push(point_item("p2", markers.p2));
        items.push(point_item("pivot", markers.pivot));
        items.push(GeometryItem::Polyline {
            points: result.arc_points.iter().map(|p| p.to_array()).collect(),
        });

        if self.settings.show_normal {
            let (start, end) = markers.normal_segment(NORMAL_DISPLAY_LENGTH);
            items.push(line_item("normal", start, end));
        }

        if self.settings.show_points {
            items.extend(
                markers
                    .interior
                    .iter()
                    .map(|point| point_item("bevel_point", *point)),
            );
        }

        if self.settings.show_mesh {
            if let Some(face) = bevel_face(request, result) {
                let mesh = face.to_mesh();
                items.push(GeometryItem::Mesh {
                    faces: mesh.triangles().map(|tri| tri.to_vec()).collect(),
                    vertices: mesh.positions,
                });
            }
        }

        Ok(items)
    }
}

fn point_item(label: &'static str, point: Point3) -> GeometryItem {
    GeometryItem::Point {
        label,
        coordinates: point.to_array(),
    }
}

fn line_item(label: &'static str, start: Point3, end: Point3) -> GeometryItem {
    GeometryItem::Line {
        label,
        start: start.to_array(),
        end: end.to_array(),
    }
}

fn finite_point(name: &'static str, point: [f64; 3]) -> Result<[f64; 3], JsValue> {
    if point.iter().all(|v| v.is_finite()) {
        Ok(point)
    } else {
        Err(to_js_error(BevelError::NonFinitePoint { name, point }))
    }
}

fn to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
