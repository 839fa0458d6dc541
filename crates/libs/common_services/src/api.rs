pub mod detect;
pub mod system;
