pub mod cascade_resolver;
pub mod constants;
pub mod frame;
#[cfg(feature = "opencv")]
pub(crate) mod mat_convert;
pub mod rect;
pub mod settings;
