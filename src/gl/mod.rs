pub mod device;
pub mod pool;
pub mod soft;
pub mod state;
