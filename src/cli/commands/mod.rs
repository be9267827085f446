pub mod menu;
pub mod run;

pub use menu::*;
pub use run::*;
