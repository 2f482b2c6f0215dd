pub mod analysis;
pub mod bar;
pub mod indicators;
pub mod market;
pub mod pattern;
pub mod score;
pub mod screen;

pub use analysis::*;
pub use bar::*;
pub use indicators::*;
pub use market::*;
pub use pattern::*;
pub use score::*;
pub use screen::*;
