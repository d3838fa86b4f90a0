pub mod describe;
pub mod evaluate;
pub mod predict;
pub mod train;
