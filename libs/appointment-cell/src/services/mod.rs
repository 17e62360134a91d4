pub mod lifecycle;
pub mod remote;
