#[cfg(target_arch = "wasm32")]
mod jserror;

#[cfg(target_arch = "wasm32")]
pub use jserror::JsErr;
