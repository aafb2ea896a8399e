pub mod capture_device;
pub mod frame_encoder;
pub mod output_sink;
