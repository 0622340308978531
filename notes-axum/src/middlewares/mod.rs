pub mod route_gate;

pub use route_gate::{route_gate, Access, RouteGate, RoutePolicy, Surface};
