// Domain layer: display model and the collaborator traits the viewer talks to.

pub mod model;
pub mod ports;
