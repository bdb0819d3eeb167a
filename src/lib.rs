pub mod constants;
pub mod data_mgmt;
pub mod helpers;
pub mod interfaces;
pub mod node_mgmt;
pub mod readers;
