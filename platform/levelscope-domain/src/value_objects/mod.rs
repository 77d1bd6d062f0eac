pub mod bar;
pub mod extremum;
pub mod label;
pub mod level;
pub mod raw_bar;
pub mod series;
