pub mod ai;
pub mod storage;
