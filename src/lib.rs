// Library interface for urlgrab
// This allows integration tests to access the modules

pub mod collector;
pub mod dispatcher;
pub mod error;
pub mod grabber;
pub mod metrics;
pub mod network;
pub mod options;
pub mod pool;
pub mod report;
pub mod storage;
pub mod utils;
