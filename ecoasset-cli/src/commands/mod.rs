pub mod area;
pub mod completions;
pub mod cover;
pub mod decode;
pub mod encode;
pub mod index;
