//! UIコンポーネント

pub mod controls;
pub mod header;
pub mod result_list;
pub mod scanner;
