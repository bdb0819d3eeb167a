pub mod modbus_rtu;
