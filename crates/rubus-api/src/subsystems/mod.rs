// Typed subsystem operations, split per subsystem.
//
// All of these are thin wrappers over `UbusClient::call` / `list` with
// fixed subsystem/method/parameter shapes.

mod file;
mod modem;
mod network;
mod services;
mod system;
mod uci;
mod wireless;

pub use services::ServiceAction;
