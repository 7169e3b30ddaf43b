pub const FACE_CASCADE_NAME: &str = "haarcascade_frontalface_default.xml";
pub const FACE_CASCADE_URL: &str =
    "https://raw.githubusercontent.com/opencv/opencv/4.x/data/haarcascades/haarcascade_frontalface_default.xml";

pub const EYE_CASCADE_NAME: &str = "haarcascade_eye.xml";
pub const EYE_CASCADE_URL: &str =
    "https://raw.githubusercontent.com/opencv/opencv/4.x/data/haarcascades/haarcascade_eye.xml";

/// Where distribution packages install the OpenCV Haar cascades.
pub const CASCADE_SEARCH_DIRS: &[&str] = &[
    "/usr/share/opencv4/haarcascades",
    "/usr/local/share/opencv4/haarcascades",
    "/usr/share/opencv/haarcascades",
    "/opt/homebrew/share/opencv4/haarcascades",
];

/// Side length of a stored sample (64x64 = 4096 values per line).
pub const SAMPLE_SIZE: u32 = 64;

pub const FACE_SCALE_FACTOR: f64 = 1.3;
pub const FACE_MIN_NEIGHBORS: i32 = 5;
pub const EYE_SCALE_FACTOR: f64 = 1.1;
pub const EYE_MIN_NEIGHBORS: i32 = 3;

pub const KEY_QUIT: char = 'q';
pub const KEY_CAPTURE: char = 'a';
pub const KEY_WAIT_MS: i32 = 1;

pub const FRAME_WINDOW: &str = "frame";
pub const FACE_WINDOW: &str = "face";
pub const SAMPLE_WINDOW: &str = "face_scaled";
