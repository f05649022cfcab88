use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

#[wasm_bindgen(typescript_custom_section)]
const TS_CONSTANTS_FACES: &'static str = r#"
export const FACE_POSITIVE_X = 0;
export const FACE_POSITIVE_Y = 1;
export const FACE_POSITIVE_Z = 2;
export const FACE_NEGATIVE_X = 3;
export const FACE_NEGATIVE_Y = 4;
export const FACE_NEGATIVE_Z = 5;
"#;

#[wasm_bindgen(typescript_custom_section)]
const TS_CONSTANTS_EXTENSION: &'static str = r#"
export const EXTENSION_POSITIVE_U = 0x1;
export const EXTENSION_NEGATIVE_U = 0x2;
export const EXTENSION_POSITIVE_V = 0x4;
export const EXTENSION_NEGATIVE_V = 0x8;
export const EXTENSION_U = 0x3;
export const EXTENSION_V = 0xc;
export const EXTENSION_ALL = 0xf;
"#;

#[wasm_bindgen(typescript_custom_section)]
const TS_CONSTANTS_DEBUG_DRAW: &'static str = r#"
export const DEBUG_DRAW_SPATIAL_INDEX = 0x1;
export const DEBUG_DRAW_ANCHORS = 0x2;
export const DEBUG_DRAW_DELIMITERS = 0x4;
export const DEBUG_DRAW_DELIMITER_FACES = 0x8;
export const DEBUG_DRAW_DELIMITER_WIREFRAMES = 0x10;
export const DEBUG_DRAW_VOLUME_FACES = 0x20;
export const DEBUG_DRAW_VOLUME_WIREFRAMES = 0x40;
export const DEBUG_DRAW_FLOOD_FILL = 0x80;
export const DEBUG_DRAW_LABELS = 0x1000;
export const DEBUG_DRAW_NORMALS = 0x2000;
export const DEBUG_DRAW_AXIS_GIZMO = 0x4000;
export const DEBUG_DRAW_ROOT_PLANES = 0x8000;
export const DEBUG_DRAW_EVERYTHING = 0xf0ff;
"#;

/// Seed for randomized helpers called from JS.
pub fn get_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * 4294967296.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        123456789 // Fixed seed for tests
    }
}
