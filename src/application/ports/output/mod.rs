pub mod toast_port;
