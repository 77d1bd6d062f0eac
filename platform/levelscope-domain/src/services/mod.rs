pub mod extrema;
pub mod fibonacci;
pub mod gann;
pub mod labels;
pub mod normalizer;
pub mod reference;
pub mod signals;
pub mod weekly;
pub mod window;
