//! Construction-time errors
//!
//! The animation itself cannot fail; only acquiring the page elements, the
//! GPU surface and the frame driver can. These are fatal and surface to the
//! entry point.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("no window available")]
    NoWindow,
    #[error("no document available")]
    NoDocument,
    #[error("missing element: {0}")]
    MissingElement(String),
    #[error("element {0} is not a canvas")]
    NotACanvas(String),
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
    #[error("javascript error: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for InitError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        InitError::Js(format!("{value:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            InitError::MissingElement("#hero-canvas".into()).to_string(),
            "missing element: #hero-canvas"
        );
        assert_eq!(InitError::NoWindow.to_string(), "no window available");
    }
}
