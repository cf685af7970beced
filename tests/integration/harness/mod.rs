pub mod app;
pub mod assertions;
pub mod builders;
pub mod time;

pub use app::*;
pub use assertions::*;
pub use builders::*;
pub use time::*;
