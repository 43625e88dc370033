pub mod common;
pub mod image;
pub mod outpaint;

pub use self::common::*;
pub use self::image::*;
pub use self::outpaint::*;
