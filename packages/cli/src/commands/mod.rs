pub mod export;
pub mod generate;
pub mod serve;

pub use export::{export, ExportArgs};
pub use generate::{generate, GenerateArgs};
pub use serve::{serve, ServeArgs};
