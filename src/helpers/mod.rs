mod load_dotenv;
mod shutdown;
mod time;

pub use load_dotenv::load_dotenv;
pub use shutdown::shutdown_channel;
pub use time::now_epoch;

pub mod schedule;
