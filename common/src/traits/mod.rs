mod encode;
pub use encode::*;
