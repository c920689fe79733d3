pub mod sensor_emitter;

pub use sensor_emitter::{SensorEmitter, format_frame, random_sample};
