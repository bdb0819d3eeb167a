pub mod decode;
pub mod models;
pub mod payload;
pub mod register_map;
pub mod report;

pub use decode::{decode, FieldError};
pub use models::{AcStatus, Measurement, Signal};
pub use payload::ReportEnvelope;
pub use register_map::{RegisterMap, AC_REGISTER_MAP};
pub use report::{Reporter, Stage, TickError};
