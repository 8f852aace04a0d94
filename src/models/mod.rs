pub mod actuator;
pub mod login;
pub mod message;
