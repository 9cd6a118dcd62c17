pub mod gate;
pub mod middleware;
