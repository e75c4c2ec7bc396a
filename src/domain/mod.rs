// Domain layer: the records the calculator works on, the preset tables and
// the ports concrete adapters implement.

pub mod model;
pub mod ports;
pub mod presets;
