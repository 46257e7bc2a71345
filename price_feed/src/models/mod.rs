pub mod raw_frame;
pub mod request_params;
