pub mod actuator_handler;
pub mod login_handler;
pub mod message_handler;
