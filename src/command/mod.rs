mod control;
mod report;
mod run;
mod status;

pub use control::{set_humidity, set_temperature, start, stop};
pub use report::report;
pub use run::run;
pub use status::status;
