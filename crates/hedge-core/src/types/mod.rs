//! 파이프라인 전반에서 사용되는 공통 타입.

mod command;
mod history;
mod instrument;
mod results;
mod series;

pub use command::*;
pub use history::*;
pub use instrument::*;
pub use results::*;
pub use series::*;
