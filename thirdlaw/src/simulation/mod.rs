pub mod states;
pub mod params;
pub mod forces;
pub mod frame;
pub mod contact;
pub mod starfield;
pub mod orbit;
pub mod scheduler;
pub mod instance;
pub mod lab;
