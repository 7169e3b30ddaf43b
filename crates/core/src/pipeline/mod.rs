pub mod capture_session_use_case;
pub mod frame_annotator;
pub mod frame_processor;
pub mod inspect_samples_use_case;
pub mod session_logger;
