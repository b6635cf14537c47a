pub mod errors;
pub mod math;
pub mod test_trace;
pub mod thread;
