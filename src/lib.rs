pub mod diagram;
pub mod discovery;
pub mod palette;
pub mod relations;
pub mod render;
pub mod schema;
pub mod source;
